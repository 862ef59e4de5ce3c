//! SOAP protocol layer.
//!
//! [`RequestBuilder`] produces envelopes for each supported operation and
//! [`ResponseParser`] turns response documents into typed results. Nothing
//! in this module performs IO.

mod attachment;
mod request;
mod response;
mod xml;

use std::fmt;

pub use attachment::{decode_base64, decode_byte_list};
pub use request::RequestBuilder;
pub use response::ResponseParser;

/// Namespace of the SOAP 1.1 envelope.
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Namespace of the registration service.
pub const SERVICE_NS: &str = "http://servisler.ws.gv.sgk.gov.tr/";

/// Date format used on the wire.
pub const WIRE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Endpoint family an operation is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceFamily {
    /// Hire notifications, hire queries and period summaries.
    Hire,
    /// Termination notifications and queries.
    Termination,
}

/// An operation supported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Submit hire notifications.
    RegisterHire,
    /// Submit termination notifications.
    RegisterTermination,
    /// Query hire filings by national id.
    QueryHire,
    /// Query termination filings by national id.
    QueryTermination,
    /// Query filings within a pay period.
    PeriodSummary,
    /// Fetch a hire confirmation document.
    HireDocument,
    /// Fetch a termination confirmation document.
    TerminationDocument,
}

impl Operation {
    /// SOAP body element and SOAPAction of the operation.
    pub fn element(&self) -> &'static str {
        match self {
            Operation::RegisterHire => "iseGirisKaydet",
            Operation::RegisterTermination => "istenCikisKaydet",
            Operation::QueryHire => "tckimlikNoileiseGirisSorgula",
            Operation::QueryTermination => "tckimlikNoileistenCikisSorgula",
            Operation::PeriodSummary => "donemIseGirisCikisSorgula",
            Operation::HireDocument => "iseGirisPdfDokum",
            Operation::TerminationDocument => "istenCikisPdfDokum",
        }
    }

    /// Element name of a per-record result in the response.
    pub fn record_tag(&self) -> Option<&'static str> {
        match self {
            Operation::RegisterHire => Some("sigortaliIseGirisSonuc"),
            Operation::RegisterTermination => Some("sigortaliIstenCikisSonuc"),
            Operation::QueryHire | Operation::PeriodSummary => Some("iseGirisKayitlari"),
            Operation::QueryTermination => Some("istenCikisKayitlari"),
            Operation::HireDocument | Operation::TerminationDocument => None,
        }
    }

    /// The endpoint family serving the operation.
    pub fn family(&self) -> ServiceFamily {
        match self {
            Operation::RegisterHire
            | Operation::QueryHire
            | Operation::PeriodSummary
            | Operation::HireDocument => ServiceFamily::Hire,
            Operation::RegisterTermination
            | Operation::QueryTermination
            | Operation::TerminationDocument => ServiceFamily::Termination,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::RegisterHire => "register_hire",
            Operation::RegisterTermination => "register_termination",
            Operation::QueryHire => "query_hire",
            Operation::QueryTermination => "query_termination",
            Operation::PeriodSummary => "fetch_period_summary",
            Operation::HireDocument => "fetch_hire_document",
            Operation::TerminationDocument => "fetch_termination_document",
        };
        write!(f, "{}", name)
    }
}
