// src/models/dn.rs

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ошибки разбора DN
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnError {
    #[error("Empty distinguished name")]
    Empty,
    #[error("Malformed RDN component: '{0}'")]
    MalformedComponent(String),
    /// Экранированные значения (`\,`, `\=`) пока не поддерживаются
    #[error("Escaped values are not supported: '{0}'")]
    UnsupportedEscape(String),
}

// ========================================
// 🏷️ RdnKind: тип компонента
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RdnKind {
    /// OU=: организационное подразделение
    OrganizationalUnit,
    /// CN=: пользователь, группа или контейнер
    CommonName,
    /// DC=: компонент домена
    DomainComponent,
    /// Любой другой тип атрибута (хранится в верхнем регистре)
    Other(String),
}

impl RdnKind {
    /// Тип атрибута регистронезависим: `ou` ≡ `OU`
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_uppercase().as_str() {
            "OU" => RdnKind::OrganizationalUnit,
            "CN" => RdnKind::CommonName,
            "DC" => RdnKind::DomainComponent,
            other => RdnKind::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            RdnKind::OrganizationalUnit => "OU",
            RdnKind::CommonName => "CN",
            RdnKind::DomainComponent => "DC",
            RdnKind::Other(tag) => tag,
        }
    }
}

// ========================================
// 🧩 Rdn: один компонент DN
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rdn {
    pub kind: RdnKind,
    pub value: String,
}

impl Rdn {
    fn parse(component: &str) -> Result<Self, DnError> {
        let component = component.trim();
        let (tag, value) = component
            .split_once('=')
            .ok_or_else(|| DnError::MalformedComponent(component.to_string()))?;
        let (tag, value) = (tag.trim(), value.trim());

        let valid_tag = !tag.is_empty()
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid_tag || value.is_empty() || value.contains('=') {
            return Err(DnError::MalformedComponent(component.to_string()));
        }

        Ok(Self {
            kind: RdnKind::from_tag(tag),
            value: value.to_string(),
        })
    }

    pub fn is_organizational_unit(&self) -> bool {
        self.kind == RdnKind::OrganizationalUnit
    }
}

impl fmt::Display for Rdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind.tag(), self.value)
    }
}

// ========================================
// 📛 DistinguishedName
// ========================================

/// DN: последовательность RDN от самого конкретного к корню,
/// например `OU=APAC,OU=Sales,DC=corp,DC=com`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistinguishedName {
    rdns: Vec<Rdn>,
}

impl DistinguishedName {
    pub fn rdns(&self) -> &[Rdn] {
        &self.rdns
    }

    /// Собственный (листовой) компонент
    pub fn leaf(&self) -> &Rdn {
        // Пустой DN не создаётся: FromStr возвращает DnError::Empty
        &self.rdns[0]
    }

    /// Количество компонентов OU=
    pub fn depth(&self) -> usize {
        self.rdns.iter().filter(|r| r.is_organizational_unit()).count()
    }

    /// Лист: OU?
    pub fn is_organizational_unit(&self) -> bool {
        self.leaf().is_organizational_unit()
    }

    /// DN родителя: тот же DN без собственного RDN
    pub fn parent(&self) -> Option<DistinguishedName> {
        if self.rdns.len() < 2 {
            return None;
        }
        Some(Self {
            rdns: self.rdns[1..].to_vec(),
        })
    }

    /// Хвост из DC= компонентов (DC=corp,DC=com)
    pub fn domain_suffix(&self) -> Option<DistinguishedName> {
        let start = self
            .rdns
            .iter()
            .rposition(|r| r.kind != RdnKind::DomainComponent)
            .map_or(0, |i| i + 1);
        if start == self.rdns.len() {
            return None;
        }
        Some(Self {
            rdns: self.rdns[start..].to_vec(),
        })
    }

    /// Имя домена из DC= компонентов: DC=corp,DC=com → corp.com
    pub fn domain_name(&self) -> String {
        self.rdns
            .iter()
            .filter(|r| r.kind == RdnKind::DomainComponent)
            .map(|r| r.value.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl FromStr for DistinguishedName {
    type Err = DnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DnError::Empty);
        }
        if s.contains('\\') {
            return Err(DnError::UnsupportedEscape(s.to_string()));
        }

        let rdns = s.split(',').map(Rdn::parse).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rdns })
    }
}

/// Каноническая форма: типы в верхнем регистре, без пробелов вокруг компонентов
impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rdn) in self.rdns.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", rdn)?;
        }
        Ok(())
    }
}

impl Serialize for DistinguishedName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DistinguishedName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ========================================
// 🔤 Строковые хелперы (контракт «как есть»)
// ========================================

/// Количество компонентов OU= в строке DN; 0, если их нет
pub fn depth(dn: &str) -> usize {
    dn.split(',')
        .filter(|part| {
            part.trim_start()
                .get(..3)
                .is_some_and(|tag| tag.eq_ignore_ascii_case("OU="))
        })
        .count()
}

/// Убирает литеральный префикс `own_rdn` (например, `OU=Sales,`) один раз.
/// Если префикс не совпал: возвращает DN без изменений («родитель не найден»).
pub fn parent_dn<'a>(dn: &'a str, own_rdn: &str) -> &'a str {
    dn.strip_prefix(own_rdn).unwrap_or(dn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dn(s: &str) -> DistinguishedName {
        s.parse().unwrap()
    }

    #[test]
    fn parses_components_in_order() {
        let parsed = dn("OU=Leaf,OU=Parent,OU=Root,DC=example,DC=com");
        let values: Vec<_> = parsed.rdns().iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, ["Leaf", "Parent", "Root", "example", "com"]);
        assert_eq!(parsed.leaf().kind, RdnKind::OrganizationalUnit);
        assert_eq!(parsed.rdns()[3].kind, RdnKind::DomainComponent);
    }

    #[test]
    fn canonical_form_normalizes_tags_and_spaces() {
        let parsed = dn(" ou=Sales , dc=corp,Dc=com ");
        assert_eq!(parsed.to_string(), "OU=Sales,DC=corp,DC=com");
        assert_eq!(parsed, dn("OU=Sales,DC=corp,DC=com"));
    }

    #[test]
    fn values_stay_case_sensitive() {
        assert_ne!(dn("OU=sales,DC=x"), dn("OU=Sales,DC=x"));
    }

    #[test]
    fn depth_counts_only_ou_components() {
        assert_eq!(dn("OU=APAC,OU=Sales,DC=x,DC=y").depth(), 2);
        assert_eq!(dn("CN=Jane,OU=APAC,OU=Sales,DC=x,DC=y").depth(), 2);
        assert_eq!(dn("CN=Jane,DC=x,DC=y").depth(), 0);
    }

    #[test]
    fn parent_drops_exactly_one_component() {
        let child = dn("OU=APAC,OU=Sales,DC=x,DC=y");
        assert_eq!(child.parent(), Some(dn("OU=Sales,DC=x,DC=y")));
        assert_eq!(dn("DC=y").parent(), None);
    }

    #[test]
    fn domain_suffix_and_name() {
        let parsed = dn("CN=Jane,OU=Sales,DC=corp,DC=acme,DC=com");
        assert_eq!(parsed.domain_suffix(), Some(dn("DC=corp,DC=acme,DC=com")));
        assert_eq!(parsed.domain_name(), "corp.acme.com");
        assert_eq!(dn("OU=Sales").domain_suffix(), None);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!("".parse::<DistinguishedName>(), Err(DnError::Empty));
        assert_eq!("   ".parse::<DistinguishedName>(), Err(DnError::Empty));
        assert!(matches!(
            "OU=Sales,,DC=x".parse::<DistinguishedName>(),
            Err(DnError::MalformedComponent(_))
        ));
        assert!(matches!(
            "Sales,DC=x".parse::<DistinguishedName>(),
            Err(DnError::MalformedComponent(_))
        ));
        assert!(matches!(
            "OU=,DC=x".parse::<DistinguishedName>(),
            Err(DnError::MalformedComponent(_))
        ));
        assert!(matches!(
            "OU=a=b,DC=x".parse::<DistinguishedName>(),
            Err(DnError::MalformedComponent(_))
        ));
    }

    #[test]
    fn escaped_values_are_rejected() {
        assert!(matches!(
            r"CN=Doe\, John,OU=Staff,DC=x".parse::<DistinguishedName>(),
            Err(DnError::UnsupportedEscape(_))
        ));
    }

    #[test]
    fn string_depth_contract() {
        assert_eq!(depth("OU=Leaf,OU=Parent,OU=Root,DC=example,DC=com"), 3);
        assert_eq!(depth("CN=Jane,DC=x,DC=y"), 0);
        assert_eq!(depth("ou=lower,DC=x"), 1);
    }

    #[test]
    fn string_parent_contract_is_fail_soft() {
        let child = "OU=APAC,OU=Sales,DC=x,DC=y";
        assert_eq!(parent_dn(child, "OU=APAC,"), "OU=Sales,DC=x,DC=y");
        assert_eq!(parent_dn(child, "OU=EMEA,"), child);
    }

    #[test]
    fn serde_uses_canonical_string() {
        let parsed: DistinguishedName = serde_json::from_str("\"ou=A,dc=x\"").unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"OU=A,DC=x\"");
        assert!(serde_json::from_str::<DistinguishedName>("\"broken\"").is_err());
    }
}
