use std::borrow::Cow;

/// Unit codes of the wallet's own coin.
///
/// Price feeds list the coin's own denominations next to fiat currencies.
/// Those are not exchange rates and get filtered out of every snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinDenominations {
    code: Cow<'static, str>,
}

impl CoinDenominations {
    pub const GOLDCOIN: CoinDenominations = CoinDenominations {
        code: Cow::Borrowed("GLC"),
    };

    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self { code: code.into() }
    }

    /// Whole-coin code (e.g., "GLC").
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether `candidate` names the coin or one of its milli/micro units.
    ///
    /// Matching ignores ASCII case, so "glc", "MGLC" and "µglc" all match.
    pub fn contains(&self, candidate: &str) -> bool {
        if candidate.eq_ignore_ascii_case(&self.code) {
            return true;
        }
        let mut chars = candidate.chars();
        match chars.next() {
            // milli, micro (ASCII u, micro sign, greek mu in both cases)
            Some('m' | 'M' | 'u' | 'U' | '\u{b5}' | '\u{3bc}' | '\u{39c}') => {
                chars.as_str().eq_ignore_ascii_case(&self.code)
            }
            _ => false,
        }
    }
}

impl Default for CoinDenominations {
    fn default() -> Self {
        Self::GOLDCOIN
    }
}
