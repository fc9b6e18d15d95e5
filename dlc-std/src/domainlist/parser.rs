use dlc_interface::{
    canonical_name,
    geosite::{domain::Type, Domain},
    Error, Result,
};

/// What one line of a rule file parses into.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rule(Domain),
    Inclusion {
        target: String,
        filters: Vec<String>,
    },
    Skip,
}

/// Strip a `#`-introduced trailing comment.
fn remove_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Parse one line into a domain rule, an inclusion directive or a skip.
///
/// A rule line is `[type:]value [@attr ...]`; the type token defaults to
/// `domain` (root domain match). Values are lower-cased except for
/// `regexp` rules, which keep their original case.
pub fn parse_line(line: &str) -> Result<Outcome> {
    let line = remove_comment(line).trim();
    if line.is_empty() {
        return Ok(Outcome::Skip);
    }

    if let Some(value) = line.strip_prefix("include:") {
        return Ok(parse_inclusion(value));
    }

    let mut tokens = line.split_whitespace();
    let rule = match tokens.next() {
        Some(token) => token,
        None => return Ok(Outcome::Skip),
    };

    let mut domain = parse_type_rule(rule)?;
    for token in tokens {
        domain.add_attribute(parse_attribute(token)?);
    }
    Ok(Outcome::Rule(domain))
}

/// `include:TARGET` includes all of the target's domains (`"@"` filter);
/// `include:TARGET@attr1@attr2` includes only domains tagged with one of
/// the named attributes.
fn parse_inclusion(value: &str) -> Outcome {
    match value.split_once('@') {
        None => Outcome::Inclusion {
            target: canonical_name(value),
            filters: vec!["@".to_string()],
        },
        Some((target, rest)) => Outcome::Inclusion {
            target: canonical_name(target),
            filters: rest
                .split('@')
                .map(|attr| attr.trim().to_lowercase())
                .filter(|attr| !attr.is_empty())
                .map(|attr| format!("@{}", attr))
                .collect(),
        },
    }
}

fn parse_type_rule(token: &str) -> Result<Domain> {
    match token.split_once(':') {
        // line without a type prefix
        None => Ok(Domain::new(Type::RootDomain, token.trim().to_lowercase())),
        Some((kind, value)) => {
            let kind = kind.trim();
            let value = value.trim();
            match kind.to_lowercase().as_str() {
                "full" => Ok(Domain::new(Type::Full, value.to_lowercase())),
                "domain" => Ok(Domain::new(Type::RootDomain, value.to_lowercase())),
                "keyword" => Ok(Domain::new(Type::Keyword, value.to_lowercase())),
                // regex values keep their original case
                "regexp" => Ok(Domain::new(Type::Regex, value)),
                _ => Err(Error::UnknownType(kind.to_string())),
            }
        }
    }
}

fn parse_attribute(token: &str) -> Result<String> {
    match token.strip_prefix('@') {
        Some(name) => Ok(name.to_lowercase()),
        None => Err(Error::InvalidAttribute(token.to_string())),
    }
}
