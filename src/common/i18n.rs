use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "es";

// Catálogos embutidos no binário: não dependem do diretório de execução.
const CATALOGS: [(&str, &str); 3] = [
    ("es", include_str!("../../locales/es.json")),
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

/// Mensagens traduzidas, indexadas por idioma e depois por chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn embedded() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("Catálogo '{}' inválido: {}", lang, e))?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self { catalogs })
    }

    /// Idioma pedido -> idioma padrão -> a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|messages| messages.get(key))
            .or_else(|| {
                self.catalogs
                    .get(DEFAULT_LANG)
                    .and_then(|messages| messages.get(key))
            })
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Como `translate`, substituindo `{0}`, `{1}`... pelos argumentos.
    pub fn format(&self, lang: &str, key: &str, args: &[&str]) -> String {
        args.iter()
            .enumerate()
            .fold(self.translate(lang, key), |message, (i, arg)| {
                message.replace(&format!("{{{}}}", i), arg)
            })
    }
}
