//! Common regex patterns for supplier invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Money amount with two decimals, optionally thousands-grouped: `1,234.50`, `9.00`.
const AMOUNT: &str = r"(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}";

/// Integer or decimal quantity.
const QUANTITY: &str = r"\d+(?:\.\d+)?";

/// Document identifier containing at least one digit.
const IDENTIFIER: &str = r"[A-Z0-9\-/]*\d[A-Z0-9\-/]*";

lazy_static! {
    // Item table layouts, in cascade order

    pub static ref LAYOUT_TAX_AMOUNT_COLUMN: Regex = Regex::new(&format!(
        r"^(?P<code>[A-Z0-9][A-Z0-9\-/]{{2,}})\s+(?P<desc>.+?)\s+(?P<qty>{q})\s+(?P<qty2>{q})\s+(?P<unit>[A-Za-z]{{1,5}})\s+\$?(?P<price>{a})\s+(?P<rate>{q})%?\s+\$?(?P<tax>{a})\s+\$?(?P<total>{a})$",
        q = QUANTITY,
        a = AMOUNT
    )).unwrap();

    pub static ref LAYOUT_PRICE_PER_UNIT: Regex = Regex::new(&format!(
        r"^(?P<code>[A-Z0-9][A-Z0-9\-/]{{2,}})\s+(?P<desc>.+?)\s+(?P<qty>{q})\s+(?P<qty2>{q})\s+(?P<unit>[A-Za-z]{{1,5}})\s+\$?(?P<price>{a})(?:\s*/\s*[A-Za-z]{{1,5}})?\s+\$?(?P<total>{a})$",
        q = QUANTITY,
        a = AMOUNT
    )).unwrap();

    pub static ref LAYOUT_TAX_INDICATOR: Regex = Regex::new(&format!(
        r"(?i)^(?P<qty>{q})\s+(?P<code>[A-Z0-9][A-Z0-9\-/]*)\s+(?P<desc>.+?)\s+\$?(?P<price>{a})\s+\$?(?P<total>{a})\s+(?P<flag>TAXED|TAX[\s\-]?FREE)$",
        q = QUANTITY,
        a = AMOUNT
    )).unwrap();

    pub static ref LAYOUT_GENERIC: Regex = Regex::new(&format!(
        r"^(?P<desc>.+?)\s+(?P<qty>{q})\s+(?P<price>{a})\s+(?P<total>{a})$",
        q = QUANTITY,
        a = AMOUNT
    )).unwrap();

    pub static ref LAYOUT_CURRENCY_PREFIXED: Regex = Regex::new(&format!(
        r"^(?P<desc>.+?)\s+(?P<qty>{q})\s+\$\s?(?P<price>{a})\s+\$\s?(?P<total>{a})$",
        q = QUANTITY,
        a = AMOUNT
    )).unwrap();

    pub static ref LAYOUT_PIPE_DELIMITED: Regex = Regex::new(&format!(
        r"^\|?\s*(?P<desc>[^|]+?)\s*\|\s*(?P<qty>{q})\s*\|\s*\$?\s?(?P<price>{a})\s*\|\s*\$?\s?(?P<total>{a})\s*\|?$",
        q = QUANTITY,
        a = AMOUNT
    )).unwrap();

    // Amounts and numbers

    pub static ref AMOUNT_PATTERN: Regex = Regex::new(&format!(r"{}\b", AMOUNT)).unwrap();

    pub static ref STANDALONE_NUMBER: Regex = Regex::new(
        r"(?:^|\s)(?P<currency>\$?)(?P<number>\d+(?:\.\d+)?)(?:\s|$)"
    ).unwrap();

    pub static ref NAME_BOUNDARY: Regex = Regex::new(
        r"\$|(?:^|\s)\d+(?:\.\d+)?(?:\s|$)"
    ).unwrap();

    pub static ref LETTER_RUN: Regex = Regex::new(r"[A-Za-z]{3,}").unwrap();

    // Line filters

    pub static ref NON_ITEM_PREFIX: Regex = Regex::new(
        r"(?i)^(?:tax\b|gst\b|delivery|thank|payment|amount\s+(?:due|paid|payable))"
    ).unwrap();

    pub static ref NON_ITEM_ANYWHERE: Regex = Regex::new(
        r"(?i)\b(?:sub\s*-?\s*)?total\b|\bfreight\b|\bshipping\b|\bdiscount\b|\bbalance\b|\bremit(?:tance)?\b|\bthank\s+you\b|\bpage\s+\d+(?:\s+of\s+\d+)?\b|\bdelivery\s+instructions?\b"
    ).unwrap();

    pub static ref SEPARATOR_LINE: Regex = Regex::new(r"^[\s\-=_*~]{3,}$").unwrap();

    pub static ref TABLE_HEADER_KEYWORD: Regex = Regex::new(
        r"(?i)\b(?:description|item|product|qty|quantity|unit|price|amount|extended)\b"
    ).unwrap();

    // Header fields

    pub static ref INVOICE_NO_WITH_COLON: Regex = Regex::new(&format!(
        r"(?i)\binvoice\s+no\.?\s*:\s*(?P<id>{})", IDENTIFIER
    )).unwrap();

    pub static ref INVOICE_NUMBER_LABEL: Regex = Regex::new(&format!(
        r"(?i)\binvoice\s+number\s*:?\s*#?\s*(?P<id>{})", IDENTIFIER
    )).unwrap();

    pub static ref INV_NO_SHORT: Regex = Regex::new(&format!(
        r"(?i)\binv(?:oice)?\.?\s*(?:no\.?|#)\s*:?\s*(?P<id>{})", IDENTIFIER
    )).unwrap();

    pub static ref TAX_INVOICE_NUMBER: Regex = Regex::new(&format!(
        r"(?i)\btax\s+invoice\s*(?:#|no\.?)?\s*:?\s*(?P<id>{})", IDENTIFIER
    )).unwrap();

    pub static ref BARE_INVOICE_NUMBER: Regex = Regex::new(r"\b(?P<id>\d{6,8})\b").unwrap();

    pub static ref CONTACT_OR_REGISTRY_LABEL: Regex = Regex::new(
        r"(?i)\b(?:ph(?:one)?|tel|fax|mob(?:ile)?|abn|acn|bsb|acc(?:oun)?t)\b"
    ).unwrap();

    pub static ref PURE_NUMBER_LINE: Regex = Regex::new(r"^[\d\s\-/.,:()+#]+$").unwrap();

    pub static ref PAGE_MARKER: Regex = Regex::new(r"(?i)^page\s*\d+").unwrap();

    pub static ref TOTAL_LABEL: Regex = Regex::new(r"(?i)\b(?:sub\s*-?\s*)?total\b").unwrap();

    pub static ref TAX_LABEL: Regex = Regex::new(r"(?i)\b(?:tax|gst|abn|vat)\b").unwrap();

    pub static ref DOLLAR_ONLY_LINE: Regex = Regex::new(r"^\$\s*[\d,]+(?:\.\d{2})?$").unwrap();

    pub static ref VENDOR_NAME_DISALLOWED: Regex = Regex::new(r"[^A-Za-z0-9\s&.\-]").unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // Dates

    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[/.\-](\d{1,2})[/.\-](\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_DAY_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+(\d{4})\b"
    ).unwrap();

    // Product code prefixes, in cleaning order

    pub static ref CODE_DASH_SEQUENCE: Regex = Regex::new(
        r"^[A-Z]{2,}(?:-[A-Z0-9]+)+\s+"
    ).unwrap();

    pub static ref CODE_SHORT_ALNUM: Regex = Regex::new(
        r"^[A-Z]{0,4}\d{2,}[A-Z0-9]*\s+"
    ).unwrap();

    pub static ref CODE_LABEL: Regex = Regex::new(
        r"(?i)^(?:code|sku|item|prod(?:uct)?(?:\s+code)?)\s*(?:no\.?)?\s*[:#]\s*\S+\s+"
    ).unwrap();

    pub static ref CODE_ALNUM_SEPARATOR: Regex = Regex::new(
        r"^[A-Za-z0-9]+(?:[-_/.][A-Za-z0-9]+)+\s*[-:|]?\s+"
    ).unwrap();

    pub static ref LEADING_PUNCTUATION: Regex = Regex::new(r"^[\s\-:|#*.]+").unwrap();

    pub static ref TRAILING_PUNCTUATION: Regex = Regex::new(r"[\s\-:|#*.,]+$").unwrap();

    // Pack sizes

    pub static ref PACK_MULTIPLIER: Regex = Regex::new(
        r"(?i)\b(\d{1,3})\s*[x×]\s*\d"
    ).unwrap();

    pub static ref PACK_SUFFIX: Regex = Regex::new(
        r"(?i)\b(\d{1,3})\s*-?\s*(?:pk|pack)\b"
    ).unwrap();

    pub static ref PACK_OF: Regex = Regex::new(r"(?i)\bpack\s+of\s+(\d{1,3})\b").unwrap();

    pub static ref PACK_CARTON: Regex = Regex::new(
        r"(?i)\b(?:ctn|carton|case|box)\s*(?:of\s*)?[x×]?\s*(\d{1,3})\b"
    ).unwrap();
}
