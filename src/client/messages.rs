use serde::{Deserialize, Serialize};

/// Languages the contact form is shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "en")]
    English,
    #[serde(alias = "es")]
    Spanish,
}

impl Language {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().split(['-', '_']).next() {
            Some("es") => Language::Spanish,
            _ => Language::English,
        }
    }
}

/// Form-level notices shown after a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Sent,
    Failed,
}

impl Notice {
    pub fn text(self, language: Language) -> &'static str {
        match (self, language) {
            (Notice::Sent, Language::English) => "Thanks! Your message has been sent.",
            (Notice::Sent, Language::Spanish) => "¡Gracias! Tu mensaje ha sido enviado.",
            (Notice::Failed, Language::English) => {
                "Something went wrong sending your message. Please try again later."
            }
            (Notice::Failed, Language::Spanish) => {
                "Algo salió mal al enviar tu mensaje. Inténtalo de nuevo más tarde."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_resolve() {
        assert_eq!(Language::from_code("es-MX"), Language::Spanish);
        assert_eq!(Language::from_code("ES"), Language::Spanish);
        assert_eq!(Language::from_code("en_GB"), Language::English);
        assert_eq!(Language::from_code("fr"), Language::English);
    }

    #[test]
    fn notices_are_localized() {
        assert_ne!(Notice::Failed.text(Language::English), Notice::Failed.text(Language::Spanish));
    }
}
