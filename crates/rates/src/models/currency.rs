//! Static currency metadata lookups.
//!
//! Symbols feed the text search of the rate query. The region table maps a
//! locale to its currency for the exact-code fallback chain.

/// Currency used when neither the requested code nor the locale resolves.
pub const DEFAULT_CURRENCY_CODE: &str = "USD";

/// Display symbol for a currency code.
///
/// Returns the code itself for currencies without a well-known symbol.
pub fn currency_symbol(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "CN¥",
        "INR" => "₹",
        "KRW" => "₩",
        "RUB" => "₽",
        "UAH" => "₴",
        "TRY" => "₺",
        "ILS" => "₪",
        "NGN" => "₦",
        "PHP" => "₱",
        "VND" => "₫",
        "THB" => "฿",
        "PLN" => "zł",
        "CAD" => "CA$",
        "AUD" => "A$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "SGD" => "S$",
        "TWD" => "NT$",
        "MXN" => "MX$",
        "BRL" => "R$",
        "ZAR" => "R",
        "CHF" => "CHF",
        "SEK" => "kr",
        "NOK" => "kr",
        "DKK" => "kr.",
        "CZK" => "Kč",
        "HUF" => "Ft",
        "IDR" => "Rp",
        "MYR" => "RM",
        "PKR" => "₨",
        "BDT" => "৳",
        "AED" => "د.إ",
        "SAR" => "﷼",
        _ => code,
    }
}

/// Currency of an ISO 3166 region code.
pub fn region_currency(region: &str) -> Option<&'static str> {
    let currency = match region {
        // Americas
        "US" | "EC" | "SV" | "PR" | "PA" => "USD",
        "CA" => "CAD",
        "MX" => "MXN",
        "BR" => "BRL",
        "AR" => "ARS",
        "CL" => "CLP",
        "CO" => "COP",
        "PE" => "PEN",
        "VE" => "VES",

        // Eurozone
        "AT" | "BE" | "CY" | "DE" | "EE" | "ES" | "FI" | "FR" | "GR" | "HR" | "IE" | "IT"
        | "LT" | "LU" | "LV" | "MT" | "NL" | "PT" | "SI" | "SK" => "EUR",

        // Rest of Europe
        "GB" => "GBP",
        "CH" | "LI" => "CHF",
        "SE" => "SEK",
        "NO" => "NOK",
        "DK" => "DKK",
        "IS" => "ISK",
        "PL" => "PLN",
        "CZ" => "CZK",
        "HU" => "HUF",
        "RO" => "RON",
        "BG" => "BGN",
        "RS" => "RSD",
        "UA" => "UAH",
        "RU" => "RUB",
        "TR" => "TRY",

        // Asia & Pacific
        "JP" => "JPY",
        "CN" => "CNY",
        "HK" => "HKD",
        "TW" => "TWD",
        "KR" => "KRW",
        "IN" => "INR",
        "PK" => "PKR",
        "BD" => "BDT",
        "ID" => "IDR",
        "MY" => "MYR",
        "SG" => "SGD",
        "TH" => "THB",
        "VN" => "VND",
        "PH" => "PHP",
        "AU" => "AUD",
        "NZ" => "NZD",

        // Middle East & Africa
        "IL" => "ILS",
        "AE" => "AED",
        "SA" => "SAR",
        "EG" => "EGP",
        "NG" => "NGN",
        "KE" => "KES",
        "ZA" => "ZAR",
        _ => return None,
    };
    Some(currency)
}

/// Currency implied by a locale tag.
///
/// Accepts POSIX tags (`en_US.UTF-8`, `de_DE@euro`) and BCP-47 tags
/// (`pt-BR`, `zh-Hant-TW`). Returns `None` when the tag carries no known
/// region, e.g. `C`, `POSIX` or plain `en`.
pub fn currency_for_locale(tag: &str) -> Option<&'static str> {
    let tag = tag.split(['.', '@']).next().unwrap_or_default();
    tag.split(['_', '-'])
        .skip(1)
        .filter(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        .find_map(|part| region_currency(&part.to_ascii_uppercase()))
}
