use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decoration placed either side of the application title.
pub const ACCENT: &str = "◆ ◇ ◆";

/// Dashboard header rendering four lines:
///
/// 1. Application title with accents (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Ledger file and currency in `[ ledger | currency ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Ledger file as shown to the user (e.g. "expenses.csv").
    pub ledger: &'a str,
    /// Currency symbol amounts are shown in.
    pub currency: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(ledger: &'a str, currency: &'a str, theme: &'a Theme) -> Self {
        Self {
            ledger,
            currency,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(" PERSONAL EXPENSE TRACKER ", self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.ledger, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.currency, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
