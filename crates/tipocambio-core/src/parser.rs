//! Decoding of indicator service replies.
//!
//! The service answers with a `<string>` element whose text is itself an XML
//! document, escaped:
//!
//! ```text
//! <string xmlns="http://ws.sdde.bccr.fi.cr">&lt;Datos_de_INGC011_CAT_INDICADORECONOMIC&gt;
//!   &lt;INGC011_CAT_INDICADORECONOMIC&gt;
//!     &lt;COD_INDICADORINTERNO&gt;317&lt;/COD_INDICADORINTERNO&gt;
//!     &lt;DES_FECHA&gt;2024-01-05T00:00:00-06:00&lt;/DES_FECHA&gt;
//!     &lt;NUM_VALOR&gt;513.64000000&lt;/NUM_VALOR&gt;
//!   &lt;/INGC011_CAT_INDICADORECONOMIC&gt;
//! &lt;/Datos_de_INGC011_CAT_INDICADORECONOMIC&gt;</string>
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{RatePoint, RateSeries, COLON_SYMBOL};
use crate::ParseError;

const ENVELOPE_TAG: &str = "string";
const RECORD_TAG: &str = "INGC011_CAT_INDICADORECONOMIC";
const DATE_FIELD: &str = "DES_FECHA";
const VALUE_FIELD: &str = "NUM_VALOR";

#[derive(Debug, Deserialize)]
struct StringEnvelope {
    #[serde(rename = "$value", default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct IndicatorDocument {
    #[serde(rename = "INGC011_CAT_INDICADORECONOMIC", default)]
    records: Vec<IndicatorRecord>,
}

#[derive(Debug, Deserialize)]
struct IndicatorRecord {
    #[serde(rename = "DES_FECHA", default)]
    date: Option<String>,
    #[serde(rename = "NUM_VALOR", default)]
    value: Option<String>,
}

/// Turns raw response bodies into [`RateSeries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateParser {
    symbol: String,
}

impl Default for RateParser {
    fn default() -> Self {
        Self::new(COLON_SYMBOL)
    }
}

impl RateParser {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn parse(&self, body: &[u8]) -> Result<RateSeries, ParseError> {
        let text = std::str::from_utf8(body).map_err(|_| ParseError::Encoding)?;

        let root = root_element(text).unwrap_or_default();
        if root != ENVELOPE_TAG {
            return Err(ParseError::OuterXml(format!(
                "expected <{ENVELOPE_TAG}> root element, found '{root}'"
            )));
        }

        let envelope: StringEnvelope =
            serde_xml_rs::from_str(text).map_err(|e| ParseError::OuterXml(e.to_string()))?;

        let document: IndicatorDocument = serde_xml_rs::from_str(&envelope.content)
            .map_err(|e| ParseError::InnerXml(e.to_string()))?;

        let points = document
            .records
            .into_iter()
            .enumerate()
            .map(|(index, record)| parse_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RateSeries::new(self.symbol.clone(), points))
    }
}

/// Local name of the first element, skipping the prolog.
fn root_element(text: &str) -> Option<&str> {
    let mut rest = text.trim_start_matches('\u{feff}').trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("<?") {
            rest = after.split_once("?>")?.1.trim_start();
        } else if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.split_once("-->")?.1.trim_start();
        } else if let Some(after) = rest.strip_prefix("<!") {
            rest = after.split_once('>')?.1.trim_start();
        } else {
            break;
        }
    }

    let tag = rest.strip_prefix('<')?;
    let end = tag
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(tag.len());
    let name = &tag[..end];
    Some(name.rsplit_once(':').map_or(name, |(_, local)| local))
}

fn parse_record(index: usize, record: IndicatorRecord) -> Result<RatePoint, ParseError> {
    let raw_date = record.date.ok_or(ParseError::MissingField {
        index,
        field: DATE_FIELD,
    })?;
    let raw_value = record.value.ok_or(ParseError::MissingField {
        index,
        field: VALUE_FIELD,
    })?;

    // The calendar date is taken in the timestamp's own offset.
    let date = OffsetDateTime::parse(raw_date.trim(), &Rfc3339)
        .map_err(|_| ParseError::InvalidDate {
            index,
            value: raw_date.clone(),
        })?
        .date();

    let rate = Decimal::from_str(raw_value.trim()).map_err(|_| ParseError::InvalidNumber {
        index,
        value: raw_value.clone(),
    })?;

    RatePoint::new(date, rate).map_err(|_| ParseError::NegativeValue {
        index,
        value: raw_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape(inner: &str) -> String {
        inner
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    const ENVELOPE_OPEN: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
                                 <string xmlns=\"http://ws.sdde.bccr.fi.cr\">";

    fn envelope(records: &str) -> Vec<u8> {
        let inner = format!("<Datos_de_{RECORD_TAG}>{records}</Datos_de_{RECORD_TAG}>");
        let body = format!("{ENVELOPE_OPEN}{}</string>", escape(&inner));
        body.into_bytes()
    }

    fn record(date: &str, value: &str) -> String {
        fields(&format!(
            "<COD_INDICADORINTERNO>317</COD_INDICADORINTERNO>\
             <DES_FECHA>{date}</DES_FECHA><NUM_VALOR>{value}</NUM_VALOR>"
        ))
    }

    fn fields(inner: &str) -> String {
        format!("<{RECORD_TAG}>{inner}</{RECORD_TAG}>")
    }

    #[test]
    fn parses_records_in_upstream_order() {
        let body = envelope(&format!(
            "{}{}{}",
            record("2024-01-08T00:00:00-06:00", "512.10000000"),
            record("2024-01-05T00:00:00-06:00", "513.64000000"),
            record("2024-01-09T00:00:00-06:00", "1234.5"),
        ));

        let series = RateParser::default().parse(&body).expect("valid body");
        let rows = series.rows();

        assert_eq!(series.len(), 3);
        assert_eq!(rows[0].date, "08/01/2024");
        assert_eq!(rows[0].rate, "₡512.10");
        assert_eq!(rows[1].date, "05/01/2024");
        assert_eq!(rows[1].rate, "₡513.64");
        assert_eq!(rows[2].rate, "₡1,234.50");
    }

    #[test]
    fn utc_timestamp_keeps_calendar_day() {
        let body = envelope(&record("2024-01-05T00:00:00Z", "500"));
        let series = RateParser::default().parse(&body).expect("valid body");
        assert_eq!(series.rows()[0].date, "05/01/2024");
    }

    #[test]
    fn empty_collection_yields_empty_series() {
        let body = envelope("");
        let series = RateParser::default().parse(&body).expect("valid body");
        assert!(series.is_empty());
    }

    #[test]
    fn missing_value_field_is_rejected() {
        let body = envelope(&fields("<DES_FECHA>2024-01-05T00:00:00-06:00</DES_FECHA>"));

        let err = RateParser::default().parse(&body).expect_err("must fail");
        assert_eq!(
            err,
            ParseError::MissingField {
                index: 0,
                field: "NUM_VALOR"
            }
        );
    }

    #[test]
    fn missing_date_field_is_rejected() {
        let body = envelope(&fields("<NUM_VALOR>513.64</NUM_VALOR>"));

        let err = RateParser::default().parse(&body).expect_err("must fail");
        assert_eq!(
            err,
            ParseError::MissingField {
                index: 0,
                field: "DES_FECHA"
            }
        );
    }

    #[test]
    fn bad_date_and_number_are_classified() {
        let bad_date = envelope(&record("05/01/2024", "513.64"));
        assert!(matches!(
            RateParser::default().parse(&bad_date),
            Err(ParseError::InvalidDate { index: 0, .. })
        ));

        let bad_number = envelope(&format!(
            "{}{}",
            record("2024-01-05T00:00:00-06:00", "513.64"),
            record("2024-01-06T00:00:00-06:00", "n/a"),
        ));
        assert!(matches!(
            RateParser::default().parse(&bad_number),
            Err(ParseError::InvalidNumber { index: 1, .. })
        ));
    }

    #[test]
    fn negative_value_is_rejected() {
        let body = envelope(&record("2024-01-05T00:00:00-06:00", "-3.5"));
        assert!(matches!(
            RateParser::default().parse(&body),
            Err(ParseError::NegativeValue { .. })
        ));
    }

    #[test]
    fn malformed_envelopes_are_classified() {
        assert_eq!(
            RateParser::default().parse(&[0xff, 0xfe]),
            Err(ParseError::Encoding)
        );
        assert!(matches!(
            RateParser::default().parse(b"<string>unterminated"),
            Err(ParseError::OuterXml(_))
        ));
        assert!(matches!(
            RateParser::default().parse(b"<string>&lt;Datos&gt;&lt;broken</string>"),
            Err(ParseError::InnerXml(_))
        ));
    }

    #[test]
    fn html_error_page_is_an_outer_failure() {
        for body in [
            "<html><body>oops</body></html>",
            "<!DOCTYPE html>\n<html><head></head></html>",
            "Service Unavailable",
            "",
        ] {
            let parsed = RateParser::default().parse(body.as_bytes());
            assert!(
                matches!(parsed, Err(ParseError::OuterXml(_))),
                "{body}: {parsed:?}"
            );
        }
    }

    #[test]
    fn prefixed_envelope_with_comment_is_accepted() {
        let inner = escape(&format!("<Datos_de_{RECORD_TAG}></Datos_de_{RECORD_TAG}>"));
        let body = format!(
            "<?xml version=\"1.0\"?>\n<!-- bccr -->\n\
             <ws:string xmlns:ws=\"http://ws.sdde.bccr.fi.cr\">{inner}</ws:string>"
        );

        assert_eq!(root_element(&format!("\u{feff}{body}")), Some("string"));
        assert!(RateParser::default().parse(body.as_bytes()).is_ok());
    }

    #[test]
    fn custom_symbol_is_applied() {
        let body = envelope(&record("2024-01-05T00:00:00-06:00", "7.1"));
        let series = RateParser::new("CRC ").parse(&body).expect("valid body");
        assert_eq!(series.rows()[0].rate, "CRC 7.10");
    }
}
