use crate::geosite::Domain;

/// Normalize an entry or file name: trimmed, upper-cased.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// A single domain list entry: a canonical name plus its rules in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    name: String,
    domains: Vec<Domain>,
}

impl Entry {
    pub fn new(name: &str) -> Entry {
        Entry {
            name: canonical_name(name),
            domains: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn add_domain(&mut self, domain: Domain) {
        self.domains.push(domain);
    }

    pub fn add_domains(&mut self, domains: impl IntoIterator<Item = Domain>) {
        self.domains.extend(domains);
    }

    pub fn into_domains(self) -> Vec<Domain> {
        self.domains
    }

    /// Render the entry in the plaintext rule format, one rule per line.
    /// Rules whose value is empty after trimming are skipped.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.domains.len() * 24);

        for domain in &self.domains {
            let value = domain.value.trim();
            if value.is_empty() {
                continue;
            }

            out.push_str(domain.kind().token());
            out.push(':');
            out.push_str(value);

            if !domain.attribute.is_empty() {
                out.push(':');
                for (idx, attr) in domain.attribute.iter().enumerate() {
                    if idx > 0 {
                        out.push(',');
                    }
                    out.push('@');
                    out.push_str(&attr.key);
                }
            }
            out.push('\n');
        }

        out
    }
}
