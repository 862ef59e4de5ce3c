//! Response document interpretation.
//!
//! A SOAP `Fault` becomes [`GatewayError::ProtocolFault`]. Negative
//! business codes stay data inside [`OperationResult`]. Absent elements map
//! to `None` and never fail the parse.

use chrono::NaiveDate;

use super::attachment::decode_attachment;
use super::xml::XmlNode;
use super::{Operation, WIRE_DATE_FORMAT};
use crate::error::{GatewayError, GatewayResult, TransportError};
use crate::models::{
    ConfirmationDocument, DocumentKind, OperationResult, RecordResult, SubjectEcho,
};

const HIRE_DATE_FIELD: &str = "giristarihi";
const TERMINATION_DATE_FIELD: &str = "istenCikisTarihi";

/// Parses response documents into typed results.
///
/// # Example
///
/// ```
/// use sgk_gateway::protocol::{Operation, ResponseParser};
///
/// let xml = r#"<S:Envelope xmlns:S="http://schemas.xmlsoap.org/soap/envelope/"><S:Body>
///   <ns2:tckimlikNoileiseGirisSorgulaResponse xmlns:ns2="http://servisler.ws.gv.sgk.gov.tr/">
///     <return><hataKodu>1</hataKodu><hataAciklama>Kayit bulunamadi</hataAciklama></return>
///   </ns2:tckimlikNoileiseGirisSorgulaResponse>
/// </S:Body></S:Envelope>"#;
///
/// let result = ResponseParser::parse_operation(xml, Operation::QueryHire).unwrap();
/// assert_eq!(result.top_level_code, Some(1));
/// assert!(result.records.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Parses the response of any record-returning operation.
    pub fn parse_operation(xml: &str, operation: Operation) -> GatewayResult<OperationResult> {
        let body = parse_body(xml)?;
        let mut records = Vec::new();
        if let Some(tag) = operation.record_tag() {
            records = parse_records(&body, tag, date_field(operation));
        }
        Ok(OperationResult {
            top_level_code: parse_code(body.find("hataKodu")),
            top_level_message: body.find("hataAciklama").and_then(text),
            records,
        })
    }

    /// Parses a registration response and aligns it with the submitted batch.
    ///
    /// The result always holds exactly `submitted` records: entries the
    /// service did not return are filled with [`RecordResult::missing`], and
    /// entries beyond the batch are dropped.
    pub fn parse_submission(
        xml: &str,
        operation: Operation,
        submitted: usize,
    ) -> GatewayResult<OperationResult> {
        let mut result = Self::parse_operation(xml, operation)?;
        result.records.resize_with(submitted, RecordResult::missing);
        Ok(result)
    }

    /// Parses a period summary into hire filings and termination filings.
    pub fn parse_period_summary(xml: &str) -> GatewayResult<(OperationResult, Vec<RecordResult>)> {
        let body = parse_body(xml)?;
        let hires = OperationResult {
            top_level_code: parse_code(body.find("hataKodu")),
            top_level_message: body.find("hataAciklama").and_then(text),
            records: parse_records(&body, "iseGirisKayitlari", HIRE_DATE_FIELD),
        };
        let terminations = parse_records(&body, "istenCikisKayitlari", TERMINATION_DATE_FIELD);
        Ok((hires, terminations))
    }

    /// Parses a confirmation document response.
    pub fn parse_document(
        xml: &str,
        kind: DocumentKind,
        reference_code: &str,
    ) -> GatewayResult<ConfirmationDocument> {
        let body = parse_body(xml)?;
        let mut nodes = Vec::new();
        body.find_all("pdfByteArray", &mut nodes);
        Ok(ConfirmationDocument {
            kind,
            reference_code: reference_code.to_string(),
            top_level_code: parse_code(body.find("hataKodu")),
            top_level_message: body.find("hataAciklama").and_then(text),
            content: decode_attachment(&nodes)?,
        })
    }

    /// Returns the fault carried by a document, if it is a well-formed fault.
    ///
    /// Used on non-success HTTP replies, where a fault body is expected.
    pub fn fault_of(xml: &str) -> Option<GatewayError> {
        let root = XmlNode::parse(xml).ok()?;
        root.find("Body")?.child("Fault").map(fault_error)
    }
}

fn parse_body(xml: &str) -> GatewayResult<XmlNode> {
    let mut root = XmlNode::parse(xml)?;
    let envelope_at = root
        .children
        .iter()
        .position(|c| c.name == "Envelope")
        .ok_or_else(|| malformed("response is not a SOAP envelope"))?;
    let mut envelope = root.children.swap_remove(envelope_at);
    let body_at = envelope
        .children
        .iter()
        .position(|c| c.name == "Body")
        .ok_or_else(|| malformed("SOAP envelope has no Body"))?;
    let body = envelope.children.swap_remove(body_at);

    if let Some(fault) = body.child("Fault") {
        return Err(fault_error(fault));
    }
    Ok(body)
}

fn fault_error(fault: &XmlNode) -> GatewayError {
    let code = fault
        .text_of("faultcode")
        .or_else(|| fault.find("Value").and_then(text))
        .unwrap_or_else(|| "Server".to_string());
    let message = fault
        .text_of("faultstring")
        .or_else(|| fault.find("Text").and_then(text))
        .unwrap_or_default();
    GatewayError::ProtocolFault { code, message }
}

fn malformed(message: &str) -> GatewayError {
    GatewayError::Transport(TransportError::MalformedResponse {
        message: message.to_string(),
    })
}

fn date_field(operation: Operation) -> &'static str {
    match operation {
        Operation::RegisterTermination
        | Operation::QueryTermination
        | Operation::TerminationDocument => TERMINATION_DATE_FIELD,
        _ => HIRE_DATE_FIELD,
    }
}

fn text(node: &XmlNode) -> Option<String> {
    node.value().map(str::to_string)
}

fn parse_code(node: Option<&XmlNode>) -> Option<i32> {
    node.and_then(XmlNode::value)?.parse().ok()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, WIRE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}

fn parse_records(body: &XmlNode, tag: &str, date_field: &str) -> Vec<RecordResult> {
    let mut nodes = Vec::new();
    body.find_all(tag, &mut nodes);
    nodes
        .into_iter()
        .map(|node| parse_record(node, date_field))
        .collect()
}

fn parse_record(node: &XmlNode, date_field: &str) -> RecordResult {
    RecordResult {
        result_code: parse_code(node.child("islemSonucu")),
        message: node.text_of("islemAciklamasi"),
        reference_id: node.text_of("referansKodu"),
        registry_number: node.text_of("sicilNo"),
        subject_echo: SubjectEcho {
            national_id: node.text_of("tckimlikNo"),
            given_name: node.text_of("ad"),
            family_name: node.text_of("soyad"),
            event_date: node.text_of(date_field).as_deref().and_then(parse_date),
            profession_code: node.text_of("meslekkodu"),
        },
        penalty: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Credentials, EducationLevel, Environment, HireRecord, InsuranceType, TaskCode,
    };
    use crate::protocol::RequestBuilder;

    fn envelope(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><S:Envelope xmlns:S="http://schemas.xmlsoap.org/soap/envelope/"><S:Body>{}</S:Body></S:Envelope>"#,
            body
        )
    }

    fn hire_response(records: &str) -> String {
        envelope(&format!(
            r#"<ns2:iseGirisKaydetResponse xmlns:ns2="http://servisler.ws.gv.sgk.gov.tr/"><return><hataKodu>0</hataKodu><hataAciklama>Islem tamamlandi</hataAciklama>{}</return></ns2:iseGirisKaydetResponse>"#,
            records
        ))
    }

    #[test]
    fn test_partial_success_keeps_per_record_codes() {
        let xml = hire_response(
            "<sigortaliIseGirisSonuc><islemSonucu>0</islemSonucu><referansKodu>R1</referansKodu><sicilNo>111</sicilNo><tckimlikNo>10000000146</tckimlikNo></sigortaliIseGirisSonuc>\
             <sigortaliIseGirisSonuc><islemSonucu>-1</islemSonucu><islemAciklamasi>Gecersiz meslek kodu</islemAciklamasi><tckimlikNo>12345678950</tckimlikNo></sigortaliIseGirisSonuc>",
        );
        let result = ResponseParser::parse_submission(&xml, Operation::RegisterHire, 2).unwrap();

        assert_eq!(result.top_level_code, Some(0));
        assert_eq!(result.top_level_message.as_deref(), Some("Islem tamamlandi"));
        assert!(!result.all_records_accepted());
        assert_eq!(result.records[0].reference_id.as_deref(), Some("R1"));
        assert_eq!(result.records[0].registry_number.as_deref(), Some("111"));
        assert_eq!(result.records[1].result_code, Some(-1));
        assert_eq!(
            result.records[1].message.as_deref(),
            Some("Gecersiz meslek kodu")
        );
        assert_eq!(
            result.records[1].subject_echo.national_id.as_deref(),
            Some("12345678950")
        );
    }

    #[test]
    fn test_missing_records_are_padded_in_position() {
        let xml = hire_response(
            "<sigortaliIseGirisSonuc><islemSonucu>0</islemSonucu></sigortaliIseGirisSonuc>",
        );
        let result = ResponseParser::parse_submission(&xml, Operation::RegisterHire, 3).unwrap();
        assert_eq!(result.records.len(), 3);
        assert!(result.records[0].is_accepted());
        assert_eq!(result.records[1], RecordResult::missing());
        assert_eq!(result.records[2].result_code, None);
    }

    #[test]
    fn test_fault_is_distinct_from_business_code() {
        let xml = envelope(
            "<S:Fault><faultcode>S:Server</faultcode><faultstring>Kullanici dogrulanamadi</faultstring></S:Fault>",
        );
        let error = ResponseParser::parse_operation(&xml, Operation::RegisterHire).unwrap_err();
        match error {
            GatewayError::ProtocolFault { code, message } => {
                assert_eq!(code, "S:Server");
                assert_eq!(message, "Kullanici dogrulanamadi");
            }
            other => panic!("expected fault, got {:?}", other),
        }

        let business = hire_response("");
        let result = ResponseParser::parse_operation(&business, Operation::RegisterHire).unwrap();
        assert_eq!(result.top_level_code, Some(0));
    }

    #[test]
    fn test_absent_fields_are_none_not_errors() {
        let xml = envelope("<r><return></return></r>");
        let result = ResponseParser::parse_operation(&xml, Operation::QueryHire).unwrap();
        assert_eq!(result.top_level_code, None);
        assert_eq!(result.top_level_message, None);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_non_numeric_code_is_none() {
        let xml = envelope("<r><hataKodu>abc</hataKodu></r>");
        let result = ResponseParser::parse_operation(&xml, Operation::QueryHire).unwrap();
        assert_eq!(result.top_level_code, None);
    }

    #[test]
    fn test_non_envelope_is_malformed() {
        let error =
            ResponseParser::parse_operation("<html><body>502</body></html>", Operation::QueryHire)
                .unwrap_err();
        assert!(matches!(
            error,
            GatewayError::Transport(TransportError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_query_termination_echo_date() {
        let xml = envelope(
            "<r><return><hataKodu>0</hataKodu><istenCikisKayitlari><tckimlikNo>10000000146</tckimlikNo><istenCikisTarihi>31.03.2026</istenCikisTarihi></istenCikisKayitlari></return></r>",
        );
        let result = ResponseParser::parse_operation(&xml, Operation::QueryTermination).unwrap();
        assert_eq!(
            result.records[0].subject_echo.event_date,
            NaiveDate::from_ymd_opt(2026, 3, 31)
        );
    }

    #[test]
    fn test_period_summary_splits_hires_and_terminations() {
        let xml = envelope(
            "<r><return><hataKodu>0</hataKodu>\
             <iseGirisKayitlari><tckimlikNo>10000000146</tckimlikNo><giristarihi>02.03.2026</giristarihi></iseGirisKayitlari>\
             <iseGirisKayitlari><tckimlikNo>12345678950</tckimlikNo></iseGirisKayitlari>\
             <istenCikisKayitlari><tckimlikNo>10000000146</tckimlikNo><istenCikisTarihi>20.03.2026</istenCikisTarihi></istenCikisKayitlari>\
             </return></r>",
        );
        let (hires, terminations) = ResponseParser::parse_period_summary(&xml).unwrap();
        assert_eq!(hires.records.len(), 2);
        assert_eq!(terminations.len(), 1);
        assert_eq!(
            hires.records[0].subject_echo.event_date,
            NaiveDate::from_ymd_opt(2026, 3, 2)
        );
        assert_eq!(
            terminations[0].subject_echo.event_date,
            NaiveDate::from_ymd_opt(2026, 3, 20)
        );
    }

    #[test]
    fn test_document_in_both_encodings() {
        let base64 = envelope(
            "<r><return><hataKodu>0</hataKodu><pdfByteArray>JVBERi0=</pdfByteArray></return></r>",
        );
        let list = envelope(
            "<r><return><hataKodu>0</hataKodu><pdfByteArray>37</pdfByteArray><pdfByteArray>80</pdfByteArray><pdfByteArray>68</pdfByteArray><pdfByteArray>70</pdfByteArray><pdfByteArray>45</pdfByteArray></return></r>",
        );
        let from_base64 =
            ResponseParser::parse_document(&base64, DocumentKind::Hire, "R1").unwrap();
        let from_list = ResponseParser::parse_document(&list, DocumentKind::Hire, "R1").unwrap();
        assert_eq!(from_base64.bytes(), Some(&b"%PDF-"[..]));
        assert_eq!(from_base64.bytes(), from_list.bytes());
        assert_eq!(from_list.reference_code, "R1");
    }

    #[test]
    fn test_document_absent_when_not_found() {
        let xml = envelope(
            "<r><return><hataKodu>1</hataKodu><hataAciklama>Kayit yok</hataAciklama></return></r>",
        );
        let document =
            ResponseParser::parse_document(&xml, DocumentKind::Termination, "R9").unwrap();
        assert_eq!(document.top_level_code, Some(1));
        assert!(document.bytes().is_none());
    }

    #[test]
    fn test_fault_of_non_success_reply() {
        let xml = envelope(
            "<S:Fault><faultcode>S:Client</faultcode><faultstring>bad</faultstring></S:Fault>",
        );
        assert!(matches!(
            ResponseParser::fault_of(&xml),
            Some(GatewayError::ProtocolFault { .. })
        ));
        assert!(ResponseParser::fault_of("Service Unavailable").is_none());
    }

    #[test]
    fn test_omitted_profession_code_round_trip_leaves_no_artifact() {
        let credentials = Credentials::new(
            "12345678901",
            "secret",
            "12345678901234567890123456",
            Environment::Test,
        );
        let record = HireRecord::new(
            "10000000146",
            "AYSE",
            "YILMAZ",
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            InsuranceType::AllBranches,
            TaskCode::Worker,
            EducationLevel::HighSchool,
        );
        let request = RequestBuilder::new(&credentials)
            .register_hire(std::slice::from_ref(&record))
            .unwrap();
        assert!(!request.contains("meslekkodu"));

        // Echo exactly what was sent for the record.
        let sent = XmlNode::parse(&request).unwrap();
        let listed = sent.find("sigortaliIseGirisListesi").unwrap();
        let echoed: String = listed
            .children
            .iter()
            .filter(|c| ["tckimlikNo", "ad", "soyad", "giristarihi", "meslekkodu"].contains(&c.name.as_str()))
            .map(|c| format!("<{0}>{1}</{0}>", c.name, c.text))
            .collect();
        let response = hire_response(&format!(
            "<sigortaliIseGirisSonuc><islemSonucu>0</islemSonucu><referansKodu>R1</referansKodu>{}</sigortaliIseGirisSonuc>",
            echoed
        ));

        let result = ResponseParser::parse_submission(&response, Operation::RegisterHire, 1).unwrap();
        let echo = &result.records[0].subject_echo;
        assert_eq!(echo.profession_code, None);
        assert_eq!(echo.national_id.as_deref(), Some("10000000146"));
        assert_eq!(echo.event_date, Some(record.hire_date));
        assert!(!serde_json::to_string(echo).unwrap().contains("profession_code"));
    }
}
