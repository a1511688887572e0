// End-to-end tests for the talking avatar batch client
//
// Each test starts its own mockito server standing in for the speech service and
// the blob storage that hosts the result video. Downloads land in a fresh
// temporary directory that is removed when the test context is dropped.

mod helpers;
mod test_poll;
mod test_submit;
