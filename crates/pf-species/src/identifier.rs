//! Compound identifier grammar.
//!
//! Identifiers are passed verbatim to the databank. Their form decides which
//! record field they are matched against:
//!
//! | Form                              | Kind       |
//! |-----------------------------------|------------|
//! | `InChI=1S/...`, `InChI=1/...`     | InChI      |
//! | `InChIKey=...`                    | InChIKey   |
//! | `PubChem=<CID>`                   | PubChem    |
//! | `SMILES=...`                      | SMILES     |
//! | `7732-18-5`                       | CAS number |
//! | anything else                     | name       |

use std::fmt;

use crate::error::{SpeciesError, SpeciesResult};

const INCHI_PREFIXES: [&str; 2] = ["InChI=1S/", "InChI=1/"];
const INCHIKEY_PREFIX: &str = "InChIKey=";
const PUBCHEM_PREFIX: &str = "PubChem=";
const SMILES_PREFIX: &str = "SMILES=";

/// A classified identifier borrowing from the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier<'a> {
    /// Common, IUPAC or synonym name.
    Name(&'a str),
    /// Full InChI string, prefix included.
    InChI(&'a str),
    /// InChIKey without the `InChIKey=` prefix.
    InChIKey(&'a str),
    /// PubChem compound id.
    PubChem(u64),
    /// SMILES without the `SMILES=` prefix.
    Smiles(&'a str),
    /// CAS registry number.
    Cas(&'a str),
}

impl<'a> Identifier<'a> {
    /// Classify raw identifier text.
    pub fn parse(raw: &'a str) -> SpeciesResult<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(SpeciesError::InvalidIdentifier {
                what: "empty identifier".to_string(),
            });
        }

        if INCHI_PREFIXES.iter().any(|p| text.starts_with(p)) {
            return Ok(Self::InChI(text));
        }
        if let Some(key) = text.strip_prefix(INCHIKEY_PREFIX) {
            return non_empty(key, INCHIKEY_PREFIX).map(Self::InChIKey);
        }
        if let Some(cid) = text.strip_prefix(PUBCHEM_PREFIX) {
            return cid
                .trim()
                .parse::<u64>()
                .map(Self::PubChem)
                .map_err(|_| SpeciesError::InvalidIdentifier {
                    what: format!("PubChem CID must be an integer, got '{cid}'"),
                });
        }
        if let Some(smiles) = text.strip_prefix(SMILES_PREFIX) {
            return non_empty(smiles, SMILES_PREFIX).map(Self::Smiles);
        }
        if looks_like_cas(text) {
            return Ok(Self::Cas(text));
        }
        Ok(Self::Name(text))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::InChI(_) => "InChI",
            Self::InChIKey(_) => "InChIKey",
            Self::PubChem(_) => "PubChem CID",
            Self::Smiles(_) => "SMILES",
            Self::Cas(_) => "CAS number",
        }
    }
}

impl fmt::Display for Identifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(s) | Self::InChI(s) | Self::Cas(s) => write!(f, "{s}"),
            Self::InChIKey(s) => write!(f, "{INCHIKEY_PREFIX}{s}"),
            Self::PubChem(cid) => write!(f, "{PUBCHEM_PREFIX}{cid}"),
            Self::Smiles(s) => write!(f, "{SMILES_PREFIX}{s}"),
        }
    }
}

fn non_empty<'a>(payload: &'a str, prefix: &str) -> SpeciesResult<&'a str> {
    let payload = payload.trim();
    if payload.is_empty() {
        Err(SpeciesError::InvalidIdentifier {
            what: format!("nothing after '{prefix}'"),
        })
    } else {
        Ok(payload)
    }
}

/// Shape check: `NNNNNNN-NN-N` with 2 to 7 leading digits.
fn looks_like_cas(text: &str) -> bool {
    let mut parts = text.split('-');
    let (Some(head), Some(mid), Some(check), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    (2..=7).contains(&head.len())
        && mid.len() == 2
        && check.len() == 1
        && digits(head)
        && digits(mid)
        && digits(check)
}

/// Shape check plus the CAS check digit.
///
/// The check digit is the sum of the other digits, weighted 1, 2, 3, ...
/// from the right, modulo 10.
pub fn is_valid_cas(text: &str) -> bool {
    let text = text.trim();
    if !looks_like_cas(text) {
        return false;
    }
    let Some((body, check)) = text.rsplit_once('-') else {
        return false;
    };
    let sum: u32 = body
        .bytes()
        .filter(u8::is_ascii_digit)
        .rev()
        .enumerate()
        .map(|(i, b)| (i as u32 + 1) * u32::from(b - b'0'))
        .sum();
    check.parse::<u32>().is_ok_and(|c| sum % 10 == c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_prefixed_forms() {
        assert_eq!(
            Identifier::parse("InChI=1S/H2O/h1H2").unwrap(),
            Identifier::InChI("InChI=1S/H2O/h1H2")
        );
        assert_eq!(
            Identifier::parse("InChI=1/CH4/h1H4").unwrap(),
            Identifier::InChI("InChI=1/CH4/h1H4")
        );
        assert_eq!(
            Identifier::parse("InChIKey=XLYOFNOQVPJJNP-UHFFFAOYSA-N").unwrap(),
            Identifier::InChIKey("XLYOFNOQVPJJNP-UHFFFAOYSA-N")
        );
        assert_eq!(
            Identifier::parse("PubChem=962").unwrap(),
            Identifier::PubChem(962)
        );
        assert_eq!(
            Identifier::parse("SMILES=CCO").unwrap(),
            Identifier::Smiles("CCO")
        );
    }

    #[test]
    fn classifies_cas_and_names() {
        assert_eq!(
            Identifier::parse("7732-18-5").unwrap(),
            Identifier::Cas("7732-18-5")
        );
        assert_eq!(
            Identifier::parse(" Water ").unwrap(),
            Identifier::Name("Water")
        );
        // Hyphenated names are not CAS numbers.
        assert_eq!(
            Identifier::parse("n-Butane").unwrap(),
            Identifier::Name("n-Butane")
        );
    }

    #[test]
    fn rejects_malformed() {
        assert!(Identifier::parse("   ").is_err());
        assert!(Identifier::parse("PubChem=abc").is_err());
        assert!(Identifier::parse("SMILES=").is_err());
        assert!(Identifier::parse("InChIKey=").is_err());
    }

    #[test]
    fn cas_check_digit() {
        assert!(is_valid_cas("7732-18-5")); // water
        assert!(is_valid_cas("64-17-5")); // ethanol
        assert!(is_valid_cas("7727-37-9")); // nitrogen
        assert!(!is_valid_cas("7732-18-4"));
        assert!(!is_valid_cas("Water"));
    }

    #[test]
    fn display_restores_prefix() {
        let id = Identifier::parse("PubChem=702").unwrap();
        assert_eq!(id.to_string(), "PubChem=702");
        assert_eq!(id.kind(), "PubChem CID");
    }
}
