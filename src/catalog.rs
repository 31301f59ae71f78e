use std::collections::HashMap;

use crate::htx::types::PayMethodRef;

pub const UNKNOWN_METHOD: &str = "Unknown method";

/// Method code to display name mapping plus the names reported on.
#[derive(Debug, Clone)]
pub struct PaymentCatalog {
    names: HashMap<String, String>,
    targets: Vec<String>,
}

impl PaymentCatalog {
    pub fn new(names: HashMap<String, String>, targets: Vec<String>) -> Self {
        Self { names, targets }
    }

    pub fn default_names() -> HashMap<String, String> {
        [
            ("28", "Тинькофф"),
            ("29", "Сбербанк"),
            ("36", "Райффайзенбанк"),
            ("69", "СБП"),
            ("70", "Переводы в определенный банк"),
            ("75", "СБП"),
            ("45", "ОТП Банк"),
            ("351", "Газпромбанк"),
        ]
        .into_iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect()
    }

    pub fn default_targets() -> Vec<String> {
        ["Сбербанк", "Тинькофф", "Райффайзенбанк", "СБП"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.names.get(code.trim()).map(|s| s.as_str())
    }

    /// Display string for a listing's payment methods.
    ///
    /// The embedded descriptor list wins when non-empty, otherwise the comma
    /// delimited code string is used. Unknown codes fall back to the raw
    /// descriptor name or code. Names are joined with ", " and repeated names
    /// (two codes mapping to the same bank) appear once.
    pub fn resolve(&self, pay_method: Option<&str>, pay_methods: &[PayMethodRef]) -> String {
        let mut names: Vec<String> = Vec::new();

        if !pay_methods.is_empty() {
            for m in pay_methods {
                let known = m.pay_method_id.as_deref().and_then(|c| self.name_for(c));
                let name = known
                    .map(str::to_string)
                    .or_else(|| m.name.clone().filter(|n| !n.trim().is_empty()))
                    .or_else(|| m.pay_method_id.clone());
                if let Some(n) = name {
                    push_unique(&mut names, n);
                }
            }
        } else if let Some(codes) = pay_method {
            for code in codes.split(',').map(str::trim).filter(|c| !c.is_empty()) {
                let name = self.name_for(code).unwrap_or(code).to_string();
                push_unique(&mut names, name);
            }
        }

        if names.is_empty() {
            return UNKNOWN_METHOD.to_string();
        }
        names.join(", ")
    }
}

impl Default for PaymentCatalog {
    fn default() -> Self {
        Self::new(Self::default_names(), Self::default_targets())
    }
}

fn push_unique(names: &mut Vec<String>, name: String) {
    if !names.contains(&name) {
        names.push(name);
    }
}
