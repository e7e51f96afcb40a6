//! Feed document parsing.
//!
//! A feed document is a root element holding one `Currency` element per
//! quoted currency:
//!
//! ```xml
//! <Tarih_Date Tarih="03.01.2024" Date="01/03/2024" Bulten_No="2024/2">
//!   <Currency CrossOrder="0" Kod="USD" CurrencyCode="USD">
//!     <Unit>1</Unit>
//!     <ForexBuying>29.6590</ForexBuying>
//!     <ForexSelling>29.7124</ForexSelling>
//!     <BanknoteBuying>29.6382</BanknoteBuying>
//!     <BanknoteSelling>29.7570</BanknoteSelling>
//!   </Currency>
//! </Tarih_Date>
//! ```

use std::collections::{BTreeMap, BTreeSet};

use kurflow_types::{Quote, QuoteField};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;

/// Name of the per-currency element.
const CURRENCY_ELEMENT: &[u8] = b"Currency";

/// Name of the currency-code attribute.
const CODE_ATTRIBUTE: &str = "Kod";

/// Errors that can occur during document parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The document is not well-formed markup.
    #[error("Malformed feed document: {0}")]
    Malformed(String),
}

/// Set of currency codes to keep. An empty set keeps every currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WantedCodes(BTreeSet<String>);

impl WantedCodes {
    /// Builds the filter from user-supplied codes (trimmed, upper-cased).
    #[must_use]
    pub fn new<S: AsRef<str>>(codes: &[S]) -> Self {
        Self(
            codes
                .iter()
                .map(|c| c.as_ref().trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
        )
    }

    /// Returns a filter that keeps every currency.
    #[must_use]
    pub const fn all() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns true if the filter keeps every currency.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `code` (already normalized) passes the filter.
    #[must_use]
    pub fn accepts(&self, code: &str) -> bool {
        self.is_unfiltered() || self.0.contains(code)
    }
}

/// Parses one quote value.
///
/// The text is trimmed and decimal commas are turned into decimal points.
/// Missing, empty or unparseable text yields `None`; this never fails.
///
/// # Example
///
/// ```
/// use kurflow_fetch::parse_quote_field;
///
/// assert_eq!(parse_quote_field(Some("34,56")), Some(34.56));
/// assert_eq!(parse_quote_field(Some(" 34.56 ")), Some(34.56));
/// assert_eq!(parse_quote_field(Some("")), None);
/// assert_eq!(parse_quote_field(None), None);
/// ```
#[must_use]
pub fn parse_quote_field(text: Option<&str>) -> Option<f64> {
    let normalized = text?.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// A `Currency` element being read.
#[derive(Debug, Default)]
struct Entry {
    code: String,
    quote: Quote,
}

/// Parses a feed document into quotes keyed by upper-case currency code.
///
/// Only `Currency` elements directly under the root are read. Entries
/// without a `Kod` attribute, and entries rejected by `wanted`, are skipped.
///
/// # Errors
///
/// Returns an error only if the markup itself cannot be parsed.
pub fn parse_document(
    content: &[u8],
    wanted: &WantedCodes,
) -> Result<BTreeMap<String, Quote>, ParseError> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(true);

    let mut quotes = BTreeMap::new();
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut entry: Option<Entry> = None;
    let mut field: Option<QuoteField> = None;
    let mut text = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError::Malformed(e.to_string()))?;

        match event {
            Event::Start(element) => {
                match depth {
                    0 => open_root(&mut root_seen)?,
                    1 if element.name().as_ref() == CURRENCY_ELEMENT => {
                        entry = Some(read_entry(&element)?);
                    }
                    2 if entry.is_some() => {
                        field = std::str::from_utf8(element.name().as_ref())
                            .ok()
                            .and_then(QuoteField::from_element_name);
                        text.clear();
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(element) => match depth {
                0 => open_root(&mut root_seen)?,
                1 if element.name().as_ref() == CURRENCY_ELEMENT => {
                    keep_entry(read_entry(&element)?, wanted, &mut quotes);
                }
                // Empty field elements leave the value unset.
                _ => {}
            },
            Event::Text(raw) => {
                let unescaped = raw
                    .unescape()
                    .map_err(|e| ParseError::Malformed(e.to_string()))?;
                if depth == 0 && !unescaped.trim().is_empty() {
                    return Err(ParseError::Malformed(
                        "text outside the root element".to_string(),
                    ));
                }
                // Only the field's own text, not that of nested elements.
                if field.is_some() && depth == 3 {
                    text.push_str(&unescaped);
                }
            }
            Event::CData(raw) => {
                if field.is_some() && depth == 3 {
                    text.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    2 => {
                        if let (Some(f), Some(current)) = (field.take(), entry.as_mut()) {
                            current.quote.set(f, parse_quote_field(Some(&text)));
                        }
                    }
                    1 => {
                        if let Some(finished) = entry.take() {
                            keep_entry(finished, wanted, &mut quotes);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => {
                if depth != 0 {
                    return Err(ParseError::Malformed(
                        "unexpected end of document".to_string(),
                    ));
                }
                if !root_seen {
                    return Err(ParseError::Malformed(
                        "document has no root element".to_string(),
                    ));
                }
                break;
            }
            _ => {}
        }
    }

    Ok(quotes)
}

/// Records the root element, rejecting a second one.
fn open_root(root_seen: &mut bool) -> Result<(), ParseError> {
    if *root_seen {
        return Err(ParseError::Malformed(
            "multiple root elements".to_string(),
        ));
    }
    *root_seen = true;
    Ok(())
}

/// Reads the currency code of a `Currency` element.
fn read_entry(element: &BytesStart<'_>) -> Result<Entry, ParseError> {
    let code = match element
        .try_get_attribute(CODE_ATTRIBUTE)
        .map_err(|e| ParseError::Malformed(e.to_string()))?
    {
        Some(attr) => attr
            .unescape_value()
            .map_err(|e| ParseError::Malformed(e.to_string()))?
            .trim()
            .to_uppercase(),
        None => String::new(),
    };

    Ok(Entry {
        code,
        quote: Quote::default(),
    })
}

/// Stores a finished entry if it has a code and passes the filter.
fn keep_entry(entry: Entry, wanted: &WantedCodes, quotes: &mut BTreeMap<String, Quote>) {
    if entry.code.is_empty() || !wanted.accepts(&entry.code) {
        return;
    }
    quotes.insert(entry.code, entry.quote);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<?xml-stylesheet type="text/xsl" href="isokur.xsl"?>
<Tarih_Date Tarih="03.01.2024" Date="01/03/2024" Bulten_No="2024/2">
  <Currency CrossOrder="0" Kod="USD" CurrencyCode="USD">
    <Unit>1</Unit>
    <Isim>ABD DOLARI</Isim>
    <CurrencyName>US DOLLAR</CurrencyName>
    <ForexBuying>29.6590</ForexBuying>
    <ForexSelling>29.7124</ForexSelling>
    <BanknoteBuying>29.6382</BanknoteBuying>
    <BanknoteSelling>29.7570</BanknoteSelling>
    <CrossRateUSD/>
    <CrossRateOther/>
  </Currency>
  <Currency CrossOrder="9" Kod="eur " CurrencyCode="EUR">
    <Unit>1</Unit>
    <ForexBuying>32,4870</ForexBuying>
    <ForexSelling>32,5455</ForexSelling>
    <BanknoteBuying>32.4643</BanknoteBuying>
    <BanknoteSelling>32.5943</BanknoteSelling>
  </Currency>
  <Currency CrossOrder="20" Kod="XDR" CurrencyCode="XDR">
    <Unit>1</Unit>
    <ForexBuying>39.6925</ForexBuying>
    <ForexSelling>39.8715</ForexSelling>
    <BanknoteBuying/>
    <BanknoteSelling></BanknoteSelling>
  </Currency>
  <Currency CrossOrder="21">
    <ForexBuying>1.0</ForexBuying>
  </Currency>
</Tarih_Date>"#;

    #[test]
    fn test_parse_all_currencies() {
        let quotes = parse_document(SAMPLE.as_bytes(), &WantedCodes::all()).unwrap();

        assert_eq!(quotes.keys().collect::<Vec<_>>(), vec!["EUR", "USD", "XDR"]);

        let usd = quotes["USD"];
        assert_relative_eq!(usd.forex_buying.unwrap(), 29.659);
        assert_relative_eq!(usd.forex_selling.unwrap(), 29.7124);
        assert_relative_eq!(usd.banknote_buying.unwrap(), 29.6382);
        assert_relative_eq!(usd.banknote_selling.unwrap(), 29.757);
    }

    #[test]
    fn test_decimal_comma_is_normalized() {
        let quotes = parse_document(SAMPLE.as_bytes(), &WantedCodes::all()).unwrap();
        let eur = quotes["EUR"];
        assert_relative_eq!(eur.forex_buying.unwrap(), 32.487);
        assert_relative_eq!(eur.forex_selling.unwrap(), 32.5455);
    }

    #[test]
    fn test_empty_fields_are_none() {
        let quotes = parse_document(SAMPLE.as_bytes(), &WantedCodes::all()).unwrap();
        let xdr = quotes["XDR"];
        assert!(xdr.forex_buying.is_some());
        assert_eq!(xdr.banknote_buying, None);
        assert_eq!(xdr.banknote_selling, None);
    }

    #[test]
    fn test_wanted_filter() {
        let wanted = WantedCodes::new(&["usd", "GBP"]);
        let quotes = parse_document(SAMPLE.as_bytes(), &wanted).unwrap();
        assert_eq!(quotes.len(), 1);
        assert!(quotes.contains_key("USD"));
    }

    #[test]
    fn test_no_matching_currencies_is_empty_not_error() {
        let wanted = WantedCodes::new(&["JPY"]);
        let quotes = parse_document(SAMPLE.as_bytes(), &wanted).unwrap();
        assert!(quotes.is_empty());
    }

    #[test]
    fn test_nested_currency_elements_are_ignored() {
        let doc = r#"<Root><Group><Currency Kod="USD"><ForexBuying>1</ForexBuying></Currency></Group></Root>"#;
        let quotes = parse_document(doc.as_bytes(), &WantedCodes::all()).unwrap();
        assert!(quotes.is_empty());
    }

    #[test]
    fn test_field_reads_only_its_own_text() {
        let doc = r#"<Root><Currency Kod="USD"><ForexBuying><b>9</b>1.5</ForexBuying></Currency></Root>"#;
        let quotes = parse_document(doc.as_bytes(), &WantedCodes::all()).unwrap();
        assert_relative_eq!(quotes["USD"].forex_buying.unwrap(), 1.5);
    }

    #[test]
    fn test_wanted_codes_normalization() {
        assert!(WantedCodes::new(&[" ", ""]).is_unfiltered());

        let wanted = WantedCodes::new(&[" eur "]);
        assert!(!wanted.is_unfiltered());
        assert!(wanted.accepts("EUR"));
        assert!(!wanted.accepts("USD"));
    }

    #[test]
    fn test_self_closing_currency_has_blank_quote() {
        let doc = r#"<Root><Currency Kod="CHF"/></Root>"#;
        let quotes = parse_document(doc.as_bytes(), &WantedCodes::all()).unwrap();
        assert!(quotes["CHF"].is_blank());
    }

    #[test]
    fn test_malformed_documents() {
        let cases: [&[u8]; 5] = [
            b"",
            b"not xml at all",
            b"<Root><Currency Kod=\"USD\"></Root>",
            b"<Root><Currency Kod=\"USD\">",
            b"<Root/><Root/>",
        ];
        for case in cases {
            let result = parse_document(case, &WantedCodes::all());
            assert!(
                matches!(result, Err(ParseError::Malformed(_))),
                "expected failure for {:?}",
                String::from_utf8_lossy(case)
            );
        }
    }

    #[test]
    fn test_parse_quote_field_malformed_inputs() {
        for text in ["", "   ", "abc", "12,34,56", "1.2.3", "--1", "NaN"] {
            assert_eq!(parse_quote_field(Some(text)), None, "input {text:?}");
        }
        assert_eq!(parse_quote_field(None), None);
    }

    #[test]
    fn test_parse_quote_field_separators_agree() {
        assert_eq!(
            parse_quote_field(Some("34,56")),
            parse_quote_field(Some("34.56"))
        );
        assert_eq!(parse_quote_field(Some("\n 1234 \t")), Some(1234.0));
    }
}
