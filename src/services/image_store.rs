// src/services/image_store.rs
// Armazenamento das imagens enviadas pelo painel (produtos, cores, logos).

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::common::error::{AppError, Resource};

pub const ALLOWED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "gif", "svg", "avif"];

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Grava os bytes e devolve o nome final do arquivo.
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, AppError>;

    async fn delete(&self, file_name: &str) -> Result<(), AppError>;

    fn public_url(&self, file_name: &str) -> String;
}

/// Remove sem propagar erro: a linha no banco já foi apagada e o arquivo é secundário.
pub async fn remove_quietly(store: &dyn ImageStore, file_name: &str) {
    if let Err(e) = store.delete(file_name).await {
        tracing::warn!("Não foi possível remover a imagem '{}': {}", file_name, e);
    }
}

/// Rejeita qualquer coisa que pareça um caminho em vez de um nome.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
}

/// Extensão em minúsculas, se for de imagem.
pub fn image_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// "Chalina Roja.PNG" -> "chalina-roja-1717000000000-a1b2c3d4.png"
pub fn unique_file_name(original_name: &str, millis: i64, suffix: &str) -> Result<String, AppError> {
    let ext = image_extension(original_name)
        .ok_or_else(|| AppError::UnsupportedFileType(original_name.to_string()))?;

    let stem = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let mut slug = String::with_capacity(stem.len());
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "image" } else { slug };

    Ok(format!("{}-{}-{}.{}", slug, millis, suffix, ext))
}

#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let file_name = unique_file_name(
            original_name,
            chrono::Utc::now().timestamp_millis(),
            &suffix[..8],
        )?;

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&file_name), bytes).await?;

        tracing::info!("Imagem gravada: {} ({} bytes)", file_name, bytes.len());
        Ok(file_name)
    }

    async fn delete(&self, file_name: &str) -> Result<(), AppError> {
        if !is_safe_file_name(file_name) {
            return Err(AppError::InvalidFileName(file_name.to_string()));
        }

        match tokio::fs::remove_file(self.root.join(file_name)).await {
            Ok(()) => {
                tracing::info!("Imagem removida: {}", file_name);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::ResourceNotFound(Resource::File)),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_slugged_and_suffixed() {
        let name = unique_file_name("Chalina Roja.PNG", 1717000000000, "a1b2c3d4").unwrap();
        assert_eq!(name, "chalina-roja-1717000000000-a1b2c3d4.png");

        let name = unique_file_name("Ñandú (1).jpeg", 5, "ff").unwrap();
        assert_eq!(name, "and-1-5-ff.jpeg");

        let name = unique_file_name("___.webp", 5, "ff").unwrap();
        assert_eq!(name, "image-5-ff.webp");
    }

    #[test]
    fn non_image_extensions_are_rejected() {
        assert!(matches!(
            unique_file_name("script.sh", 1, "x"),
            Err(AppError::UnsupportedFileType(_))
        ));
        assert!(unique_file_name("sin-extension", 1, "x").is_err());
        assert_eq!(image_extension("logo.SVG").as_deref(), Some("svg"));
    }

    #[test]
    fn path_like_names_are_unsafe() {
        assert!(is_safe_file_name("gorro-1-abc.png"));
        assert!(!is_safe_file_name("../etc/passwd"));
        assert!(!is_safe_file_name("sub/dir.png"));
        assert!(!is_safe_file_name("sub\\dir.png"));
        assert!(!is_safe_file_name(".env"));
        assert!(!is_safe_file_name(""));
    }

    #[tokio::test]
    async fn save_then_delete_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().join("images"), "/images/");

        let name = store.save("Gorro.png", b"fake-png").await.unwrap();
        assert!(name.starts_with("gorro-") && name.ends_with(".png"));
        assert_eq!(store.public_url(&name), format!("/images/{}", name));

        let on_disk = tokio::fs::read(store.root().join(&name)).await.unwrap();
        assert_eq!(on_disk, b"fake-png");

        store.delete(&name).await.unwrap();
        assert!(matches!(
            store.delete(&name).await,
            Err(AppError::ResourceNotFound(Resource::File))
        ));
    }

    #[tokio::test]
    async fn delete_refuses_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path(), "/images");
        assert!(matches!(
            store.delete("../secret.png").await,
            Err(AppError::InvalidFileName(_))
        ));
    }
}
