//! Localized messages for known FreshMail error codes.

/// Messages shipped with the client, keyed by vendor error code.
const FRESHMAIL_MESSAGES: &[(i64, &str)] = &[
    (1301, "Adres email jest niepoprawny!"),
    (1302, "Lista subskrypcyjna nie istnieje lub brak hash'a listy!"),
    (1303, "Jedno lub więcej pól dodatkowych jest niepoprawne!"),
    (1304, "Subskrybent już istnieje w tej liście subskrypcyjnej!"),
    (1305, "Próbowano nadać niepoprawny status subskrybenta!"),
];

/// Read-only mapping from vendor error code to a human-readable message.
///
/// Codes missing from the catalog keep the message the API sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCatalog {
    entries: &'static [(i64, &'static str)],
}

impl ErrorCatalog {
    /// The catalog for the FreshMail subscriber endpoints.
    pub const FRESHMAIL: Self = Self::new(FRESHMAIL_MESSAGES);

    /// A catalog with no entries; every vendor message passes through.
    pub const EMPTY: Self = Self::new(&[]);

    /// Create a catalog over a static table.
    pub const fn new(entries: &'static [(i64, &'static str)]) -> Self {
        Self { entries }
    }

    /// Look up the localized message for a code.
    pub fn message(&self, code: i64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, message)| *message)
    }

    /// Resolve the message to report: localized if known, otherwise the vendor text.
    pub fn resolve<'a>(&self, code: i64, vendor_message: &'a str) -> &'a str {
        self.message(code).unwrap_or(vendor_message)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        Self::FRESHMAIL
    }
}
