use std::net::{Ipv4Addr, Ipv6Addr};

use hickory_proto::rr::{self, Name, RData, Record};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Record types the client asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    AAAA,
    /// Canonical name record
    CNAME,
    /// Pointer record (reverse DNS)
    PTR,
}

impl From<RecordType> for rr::RecordType {
    fn from(record_type: RecordType) -> Self {
        match record_type {
            RecordType::A => Self::A,
            RecordType::AAAA => Self::AAAA,
            RecordType::CNAME => Self::CNAME,
            RecordType::PTR => Self::PTR,
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::AAAA => write!(f, "AAAA"),
            Self::CNAME => write!(f, "CNAME"),
            Self::PTR => write!(f, "PTR"),
        }
    }
}

/// A single question sent in one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    name: Name,
    record_type: RecordType,
}

impl Question {
    /// Build a question for `name`, appending the root label when it is missing
    ///
    /// # Errors
    /// Returns `Error::InvalidName` if the name is not a valid domain name
    pub fn new(name: &str, record_type: RecordType) -> Result<Self> {
        let fqdn = if name.ends_with('.') {
            name.to_string()
        } else {
            format!("{name}.")
        };
        let name = Name::from_ascii(&fqdn).map_err(|e| Error::invalid_name(fqdn, e))?;
        Ok(Self { name, record_type })
    }

    /// The fully-qualified name being asked about
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub const fn record_type(&self) -> RecordType {
        self.record_type
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.record_type)
    }
}

/// An answer record reduced to the kinds the client understands.
///
/// Names keep their trailing root dot, exactly as they came off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(String),
    Ptr(String),
    /// Any other record type, ignored by lookups
    Other(rr::RecordType),
}

impl From<&Record> for Answer {
    fn from(record: &Record) -> Self {
        match record.data() {
            Some(RData::A(a)) => Self::A(a.0),
            Some(RData::AAAA(aaaa)) => Self::Aaaa(aaaa.0),
            Some(RData::CNAME(cname)) => Self::Cname(cname.0.to_string()),
            Some(RData::PTR(ptr)) => Self::Ptr(ptr.0.to_string()),
            _ => Self::Other(record.record_type()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::rr::rdata::{A, CNAME, MX, PTR};

    fn name(s: &str) -> Name {
        Name::from_ascii(s).unwrap()
    }

    #[test]
    fn test_question_appends_root_label() {
        let question = Question::new("host.example", RecordType::A).unwrap();
        assert!(question.name().is_fqdn());
        assert_eq!(question.name().to_string(), "host.example.");
        assert_eq!(question.to_string(), "host.example. A");
    }

    #[test]
    fn test_question_keeps_existing_root_label() {
        let question = Question::new("host.example.", RecordType::AAAA).unwrap();
        assert_eq!(question.name().to_string(), "host.example.");
        assert_eq!(question.record_type(), RecordType::AAAA);
    }

    #[test]
    fn test_question_rejects_oversized_label() {
        let label = "a".repeat(64);
        let err = Question::new(&format!("{label}.example"), RecordType::A).unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
    }

    #[test]
    fn test_answer_from_records() {
        let owner = name("host.example.");

        let a = Record::from_rdata(owner.clone(), 60, RData::A(A(Ipv4Addr::new(192, 0, 2, 1))));
        assert_eq!(Answer::from(&a), Answer::A(Ipv4Addr::new(192, 0, 2, 1)));

        let cname = Record::from_rdata(owner.clone(), 60, RData::CNAME(CNAME(name("alias.example."))));
        assert_eq!(Answer::from(&cname), Answer::Cname("alias.example.".to_string()));

        let ptr = Record::from_rdata(owner.clone(), 60, RData::PTR(PTR(name("dns.example."))));
        assert_eq!(Answer::from(&ptr), Answer::Ptr("dns.example.".to_string()));

        let mx = Record::from_rdata(owner, 60, RData::MX(MX::new(10, name("mail.example."))));
        assert_eq!(Answer::from(&mx), Answer::Other(rr::RecordType::MX));
    }

    #[test]
    fn test_record_type_conversion() {
        assert_eq!(rr::RecordType::from(RecordType::PTR), rr::RecordType::PTR);
        assert_eq!(RecordType::AAAA.to_string(), "AAAA");
    }
}
