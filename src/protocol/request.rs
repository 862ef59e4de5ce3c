//! Request envelope construction.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::xml::XmlWriter;
use super::{Operation, SERVICE_NS, SOAP_ENVELOPE_NS, WIRE_DATE_FORMAT};
use crate::error::{GatewayResult, TransportError};
use crate::models::{
    Credentials, DocumentKind, HireRecord, PeriodEarnings, PeriodInfo, TerminationRecord,
};

/// Builds SOAP envelopes for one set of credentials.
///
/// Records are written in the order given, and optional values that are
/// absent are left out of the payload entirely.
///
/// # Example
///
/// ```
/// use sgk_gateway::models::{Credentials, Environment};
/// use sgk_gateway::protocol::RequestBuilder;
///
/// let credentials = Credentials::new(
///     "12345678901",
///     "secret",
///     "12345678901234567890123456",
///     Environment::Test,
/// );
/// let envelope = RequestBuilder::new(&credentials).query_hire("10000000146").unwrap();
/// assert!(envelope.contains("<tckimlikNo>10000000146</tckimlikNo>"));
/// assert!(!envelope.contains("sistemSifre"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    credentials: &'a Credentials,
}

impl<'a> RequestBuilder<'a> {
    /// Creates a builder for the given credentials.
    pub fn new(credentials: &'a Credentials) -> Self {
        Self { credentials }
    }

    /// Envelope for a hire notification batch.
    pub fn register_hire(&self, records: &[HireRecord]) -> GatewayResult<String> {
        let mut w = self.open(Operation::RegisterHire)?;
        for record in records {
            w.start("sigortaliIseGirisListesi")?;
            write_hire(&mut w, record)?;
            w.end("sigortaliIseGirisListesi")?;
        }
        Ok(self.close(w, Operation::RegisterHire)?)
    }

    /// Envelope for a termination notification batch.
    pub fn register_termination(&self, records: &[TerminationRecord]) -> GatewayResult<String> {
        let mut w = self.open(Operation::RegisterTermination)?;
        for record in records {
            w.start("sigortaliIstenCikisListesi")?;
            write_termination(&mut w, record)?;
            w.end("sigortaliIstenCikisListesi")?;
        }
        Ok(self.close(w, Operation::RegisterTermination)?)
    }

    /// Envelope for a hire query by national id.
    pub fn query_hire(&self, national_id: &str) -> GatewayResult<String> {
        self.single_field(Operation::QueryHire, "tckimlikNo", national_id)
    }

    /// Envelope for a termination query by national id.
    pub fn query_termination(&self, national_id: &str) -> GatewayResult<String> {
        self.single_field(Operation::QueryTermination, "tckimlikNo", national_id)
    }

    /// Envelope for the filings of one pay period.
    pub fn period_summary(&self, period: &PeriodInfo) -> GatewayResult<String> {
        let mut w = self.open(Operation::PeriodSummary)?;
        w.element("baslangicTarihi", &wire_date(period.start_date))?;
        w.element("bitisTarihi", &wire_date(period.end_date))?;
        Ok(self.close(w, Operation::PeriodSummary)?)
    }

    /// Envelope for a confirmation document request.
    pub fn confirmation_document(
        &self,
        kind: DocumentKind,
        reference_code: &str,
    ) -> GatewayResult<String> {
        let operation = match kind {
            DocumentKind::Hire => Operation::HireDocument,
            DocumentKind::Termination => Operation::TerminationDocument,
        };
        self.single_field(operation, "referansKodu", reference_code)
    }

    fn single_field(&self, operation: Operation, name: &str, value: &str) -> GatewayResult<String> {
        let mut w = self.open(operation)?;
        w.element(name, value.trim())?;
        Ok(self.close(w, operation)?)
    }

    fn open(&self, operation: Operation) -> Result<XmlWriter, TransportError> {
        let mut w = XmlWriter::new();
        w.declaration()?;
        w.start_with(
            "soapenv:Envelope",
            &[("xmlns:soapenv", SOAP_ENVELOPE_NS), ("xmlns:ws", SERVICE_NS)],
        )?;
        w.empty("soapenv:Header")?;
        w.start("soapenv:Body")?;
        w.start(&body_element(operation))?;

        w.start("kullaniciBilgileri")?;
        w.element("kullaniciAdi", self.credentials.username())?;
        w.element("isyeriSicil", self.credentials.employer_registry_id())?;
        w.element("isyeriSifre", self.credentials.password())?;
        w.optional("sistemSifre", self.credentials.system_password())?;
        w.end("kullaniciBilgileri")?;
        Ok(w)
    }

    fn close(&self, mut w: XmlWriter, operation: Operation) -> Result<String, TransportError> {
        w.end(&body_element(operation))?;
        w.end("soapenv:Body")?;
        w.end("soapenv:Envelope")?;
        w.finish()
    }
}

fn body_element(operation: Operation) -> String {
    format!("ws:{}", operation.element())
}

fn write_hire(w: &mut XmlWriter, record: &HireRecord) -> Result<(), TransportError> {
    w.element("tckimlikNo", record.national_id.trim())?;
    w.element("ad", record.given_name.trim())?;
    w.element("soyad", record.family_name.trim())?;
    w.element("giristarihi", &wire_date(record.hire_date))?;
    w.element("sigortaliTuru", record.insurance_type.code())?;
    w.element("gorevkodu", record.task_code.code())?;
    w.optional("meslekkodu", record.profession_code.as_deref())?;
    w.element("eskihukumlu", flag(record.ex_convict))?;
    w.element("ozurlu", flag(record.disabled))?;
    w.element("ogrenimkodu", record.education.code())?;
    w.optional("mezuniyetbolumu", record.graduation_department.as_deref())?;
    w.optional(
        "mezuniyetyili",
        record.graduation_year.map(|y| y.to_string()).as_deref(),
    )?;
    w.element("kismiSureliCalisiyormu", flag(record.partial_time))?;
    if record.partial_time {
        w.optional(
            "kismiSureliCalismaGunSayisi",
            record.partial_time_days.map(|d| d.to_string()).as_deref(),
        )?;
    }
    if record.same_employer_transfer {
        w.element("ayniIsverenFarkliIsyeriNakil", flag(true))?;
        w.optional(
            "nakilGeldigiIsyeriSicil",
            record.transfer_source_registry_id.as_deref(),
        )?;
    }
    Ok(())
}

fn write_termination(w: &mut XmlWriter, record: &TerminationRecord) -> Result<(), TransportError> {
    w.element("tckimlikNo", record.national_id.trim())?;
    w.element("ad", record.given_name.trim())?;
    w.element("soyad", record.family_name.trim())?;
    w.element("istenCikisTarihi", &wire_date(record.termination_date))?;
    w.element("istenCikisNedeni", record.reason.code())?;
    w.optional("meslekkodu", record.profession_code.as_deref())?;
    if record.reason.is_transfer() {
        w.optional(
            "nakilGidecegiIsyeriSicil",
            record.destination_registry_id.as_deref(),
        )?;
    }
    write_earnings(w, "bulundugumuzDonem", &record.current_period)?;
    if let Some(prior) = &record.prior_period {
        write_earnings(w, "oncekiDonem", prior)?;
    }
    Ok(())
}

fn write_earnings(
    w: &mut XmlWriter,
    name: &str,
    earnings: &PeriodEarnings,
) -> Result<(), TransportError> {
    w.start(name)?;
    w.element("hakedilenucret", &amount(earnings.earned_wage))?;
    w.element("primikramiye", &amount(earnings.bonus))?;
    w.element("eksikgunsayisi", &earnings.missing_days.to_string())?;
    if earnings.missing_days > 0 {
        w.optional("eksikgunnedeni", earnings.missing_day_reason.as_deref())?;
    }
    w.end(name)
}

fn wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

fn flag(value: bool) -> &'static str {
    if value { "E" } else { "H" }
}

fn amount(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EducationLevel, EmployerCategory, Environment, InsuranceType, TaskCode, TerminationReason,
    };

    fn create_credentials() -> Credentials {
        Credentials::new(
            "12345678901",
            "workplace-secret",
            "12345678901234567890123456",
            Environment::Test,
        )
    }

    fn create_hire() -> HireRecord {
        HireRecord::new(
            "10000000146",
            "AYSE",
            "YILMAZ",
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            InsuranceType::AllBranches,
            TaskCode::Worker,
            EducationLevel::HighSchool,
        )
    }

    fn create_termination(reason: TerminationReason) -> TerminationRecord {
        TerminationRecord {
            national_id: "10000000146".to_string(),
            given_name: "AYSE".to_string(),
            family_name: "YILMAZ".to_string(),
            termination_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            reason,
            profession_code: None,
            destination_registry_id: None,
            current_period: PeriodEarnings::wage_only(Decimal::new(250005, 1)),
            prior_period: None,
        }
    }

    #[test]
    fn test_envelope_wraps_credentials_and_body() {
        let credentials = create_credentials().with_system_password("system-secret");
        let xml = RequestBuilder::new(&credentials)
            .register_hire(&[create_hire()])
            .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(
            "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\" xmlns:ws=\"http://servisler.ws.gv.sgk.gov.tr/\">"
        ));
        assert!(xml.contains(
            "<kullaniciBilgileri><kullaniciAdi>12345678901</kullaniciAdi><isyeriSicil>12345678901234567890123456</isyeriSicil><isyeriSifre>workplace-secret</isyeriSifre><sistemSifre>system-secret</sistemSifre></kullaniciBilgileri>"
        ));
        assert!(xml.contains("<ws:iseGirisKaydet>"));
        assert!(xml.ends_with("</ws:iseGirisKaydet></soapenv:Body></soapenv:Envelope>"));
    }

    #[test]
    fn test_hire_fields_in_order_with_optional_omission() {
        let credentials = create_credentials();
        let xml = RequestBuilder::new(&credentials)
            .register_hire(&[create_hire()])
            .unwrap();

        assert!(xml.contains(
            "<sigortaliIseGirisListesi><tckimlikNo>10000000146</tckimlikNo><ad>AYSE</ad><soyad>YILMAZ</soyad><giristarihi>02.03.2026</giristarihi><sigortaliTuru>0</sigortaliTuru><gorevkodu>02</gorevkodu><eskihukumlu>H</eskihukumlu><ozurlu>H</ozurlu><ogrenimkodu>4</ogrenimkodu><kismiSureliCalisiyormu>H</kismiSureliCalisiyormu></sigortaliIseGirisListesi>"
        ));
        assert!(!xml.contains("meslekkodu"));
        assert!(!xml.contains("sistemSifre"));
        assert!(!xml.contains("kismiSureliCalismaGunSayisi"));
        assert!(!xml.contains("nakil"));
    }

    #[test]
    fn test_partial_time_and_transfer_fields() {
        let mut record = create_hire();
        record.profession_code = Some("9313.01".to_string());
        record.partial_time = true;
        record.partial_time_days = Some(12);
        record.same_employer_transfer = true;
        record.transfer_source_registry_id = Some("98765432109876543210987654".to_string());
        record.graduation_year = Some(2019);

        let credentials = create_credentials();
        let xml = RequestBuilder::new(&credentials)
            .register_hire(&[record])
            .unwrap();

        assert!(xml.contains("<meslekkodu>9313.01</meslekkodu>"));
        assert!(xml.contains("<mezuniyetyili>2019</mezuniyetyili>"));
        assert!(xml.contains(
            "<kismiSureliCalisiyormu>E</kismiSureliCalisiyormu><kismiSureliCalismaGunSayisi>12</kismiSureliCalismaGunSayisi>"
        ));
        assert!(xml.contains(
            "<ayniIsverenFarkliIsyeriNakil>E</ayniIsverenFarkliIsyeriNakil><nakilGeldigiIsyeriSicil>98765432109876543210987654</nakilGeldigiIsyeriSicil>"
        ));
    }

    #[test]
    fn test_batch_keeps_submission_order() {
        let mut second = create_hire();
        second.national_id = "12345678950".to_string();
        let credentials = create_credentials();
        let xml = RequestBuilder::new(&credentials)
            .register_hire(&[create_hire(), second])
            .unwrap();

        let first_at = xml.find("10000000146").unwrap();
        let second_at = xml.find("12345678950").unwrap();
        assert!(first_at < second_at);
        assert_eq!(xml.matches("<sigortaliIseGirisListesi>").count(), 2);
    }

    #[test]
    fn test_termination_amounts_and_transfer_destination() {
        let mut record = create_termination(TerminationReason::SameEmployerTransfer);
        record.destination_registry_id = Some("98765432109876543210987654".to_string());
        record.current_period.missing_days = 2;
        record.current_period.missing_day_reason = Some("01".to_string());

        let credentials = create_credentials();
        let xml = RequestBuilder::new(&credentials)
            .register_termination(&[record])
            .unwrap();

        assert!(xml.contains("<istenCikisTarihi>31.03.2026</istenCikisTarihi>"));
        assert!(xml.contains("<istenCikisNedeni>16</istenCikisNedeni>"));
        assert!(xml.contains(
            "<nakilGidecegiIsyeriSicil>98765432109876543210987654</nakilGidecegiIsyeriSicil>"
        ));
        assert!(xml.contains(
            "<bulundugumuzDonem><hakedilenucret>25000.50</hakedilenucret><primikramiye>0.00</primikramiye><eksikgunsayisi>2</eksikgunsayisi><eksikgunnedeni>01</eksikgunnedeni></bulundugumuzDonem>"
        ));
        assert!(!xml.contains("oncekiDonem"));
    }

    #[test]
    fn test_non_transfer_termination_omits_destination() {
        let mut record = create_termination(TerminationReason::Resignation);
        record.destination_registry_id = Some("98765432109876543210987654".to_string());
        record.prior_period = Some(PeriodEarnings::wage_only(Decimal::new(1000, 0)));

        let credentials = create_credentials();
        let xml = RequestBuilder::new(&credentials)
            .register_termination(&[record])
            .unwrap();

        assert!(!xml.contains("nakilGidecegiIsyeriSicil"));
        assert!(!xml.contains("eksikgunnedeni"));
        assert!(xml.contains("<oncekiDonem><hakedilenucret>1000.00</hakedilenucret>"));
    }

    #[test]
    fn test_period_summary_dates() {
        let period =
            crate::calculation::compute_period(EmployerCategory::Public, 2024, 1).unwrap();
        let credentials = create_credentials();
        let xml = RequestBuilder::new(&credentials)
            .period_summary(&period)
            .unwrap();
        assert!(xml.contains(
            "<baslangicTarihi>15.01.2024</baslangicTarihi><bitisTarihi>14.02.2024</bitisTarihi>"
        ));
    }

    #[test]
    fn test_document_request_per_kind() {
        let credentials = create_credentials();
        let builder = RequestBuilder::new(&credentials);
        let hire = builder
            .confirmation_document(DocumentKind::Hire, "REF-1")
            .unwrap();
        let termination = builder
            .confirmation_document(DocumentKind::Termination, "REF-2")
            .unwrap();
        assert!(hire.contains("<ws:iseGirisPdfDokum>"));
        assert!(hire.contains("<referansKodu>REF-1</referansKodu>"));
        assert!(termination.contains("<ws:istenCikisPdfDokum>"));
    }

    #[test]
    fn test_names_are_escaped() {
        let mut record = create_hire();
        record.family_name = "O<B>&".to_string();
        let credentials = create_credentials();
        let xml = RequestBuilder::new(&credentials)
            .register_hire(&[record])
            .unwrap();
        assert!(xml.contains("<soyad>O&lt;B&gt;&amp;</soyad>"));
    }
}
