use crate::domain::synthesis::TextType;
use crate::error::{AppError, AppResult};
use std::path::Path;

/// Script read from disk together with the text type it should be submitted as
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub text_type: TextType,
    pub content: String,
}

/// Read the script file. An explicit text type wins over the one inferred from the extension.
pub async fn load_script(path: &Path, text_type: Option<TextType>) -> AppResult<Script> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::Configuration(format!("Failed to read script {}: {}", path.display(), e))
    })?;

    let text_type = text_type.unwrap_or_else(|| TextType::infer_from_path(path));

    tracing::info!(
        path = %path.display(),
        text_type = %text_type,
        characters = content.chars().count(),
        "Script loaded"
    );

    Ok(Script { text_type, content })
}
