// src/models/upload.rs

use serde::Serialize;
use utoipa::ToSchema;

// Resposta do upload: o nome gravado é o que o painel salva nos produtos.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[schema(example = "gorro-rojo-1718000000000-3f9a1c2e.png")]
    pub file_name: String,
    #[schema(example = "/images/gorro-rojo-1718000000000-3f9a1c2e.png")]
    pub url: String,
}

/// Formulário multipart do upload (só documentação; o handler lê o campo à mão).
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
