//! Map free-text country names to ISO 3166 alpha-3 codes.

use std::collections::HashMap;

use itertools::Itertools;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::RegexSet;

use crate::error::Result;
use crate::frame::{Frame, Value};

pub const COUNTRY_CODE_COLUMN: &str = "country_code";

pub trait CountryResolver: Send + Sync {
    /// ISO alpha-3 code for a country name, if it is one.
    fn resolve(&self, name: &str) -> Option<String>;
}

// Patterns are tried in order and run against `normalize_name` output.
// Names that contain another country's name come before it.
const ALIASES: &[(&str, &str)] = &[
    ("COD", r"\bdr congo\b|congo kinshasa|democratic republic of (the )?congo|\bdrc\b|zaire"),
    ("COG", r"congo"),
    ("SSD", r"south sudan"),
    ("SDN", r"sudan"),
    ("GNB", r"guinea bissau"),
    ("GNQ", r"equatorial guinea"),
    ("PNG", r"papua"),
    ("GIN", r"guinea"),
    ("NGA", r"nigeria"),
    ("NER", r"\bniger\b"),
    ("DOM", r"dominican"),
    ("DMA", r"dominica"),
    ("ASM", r"american samoa"),
    ("WSM", r"samoa"),
    ("VIR", r"\b(u s|us|united states|american) virgin islands|virgin islands u ?s\b"),
    ("VGB", r"virgin islands"),
    ("PRK", r"korea north|north korea|korea dem|democratic people s republic of korea|\bdprk\b"),
    ("KOR", r"korea"),
    ("UMI", r"minor outlying"),
    ("IOT", r"british indian ocean"),
    ("USA", r"^us$|^usa$|^u s a?$|united states"),
    ("GBR", r"united kingdom|^uk$|great britain|england|scotland|wales|northern ireland"),
    ("IRL", r"ireland"),
    ("ATF", r"french southern"),
    ("PYF", r"french polynesia"),
    ("GUF", r"french guiana"),
    ("FRA", r"^france$|french republic"),
    ("SXM", r"sint maarten"),
    ("MAF", r"\b(saint|st) martin"),
    ("BES", r"caribbean netherlands|bonaire|\bsaba\b|sint eustatius"),
    ("NLD", r"netherlands|holland"),
    ("HKG", r"hong kong"),
    ("MAC", r"maca[ou]"),
    ("TWN", r"taiwan"),
    ("CHN", r"china"),
    ("PSE", r"palestin|west bank|gaza"),
    ("VAT", r"holy see|vatican"),
    ("CIV", r"ivoire|ivory coast"),
    ("MMR", r"myanmar|burma"),
    ("CPV", r"cabo verde|cape verde"),
    ("SWZ", r"eswatini|swaziland"),
    ("MKD", r"macedonia"),
    ("CZE", r"czech"),
    ("LAO", r"\blao"),
    ("FSM", r"micronesia"),
    ("TLS", r"timor"),
    ("RUS", r"russia"),
    ("SYR", r"syria"),
    ("IRN", r"\biran\b"),
    ("VEN", r"venezuela"),
    ("BOL", r"bolivia"),
    ("TZA", r"tanzania"),
    ("MDA", r"moldova"),
    ("VNM", r"viet ?nam"),
    ("BRN", r"brunei"),
    ("KNA", r"\b(saint|st) kitts|nevis"),
    ("LCA", r"\b(saint|st) lucia"),
    ("VCT", r"\b(saint|st) vincent|grenadines"),
    ("SPM", r"\b(saint|st) pierre|miquelon"),
    ("SHN", r"\b(saint|st) helena"),
    ("BLM", r"\b(saint|st) barth"),
    ("STP", r"sao tome|principe"),
    ("TCA", r"turks"),
    ("WLF", r"wallis|futuna"),
    ("FLK", r"falkland|malvinas"),
    ("SGS", r"south georgia"),
    ("GEO", r"^georgia$"),
    ("HMD", r"heard island"),
    ("GMB", r"gambia"),
    ("BHS", r"bahamas"),
    ("XKX", r"kosovo"),
    ("CUW", r"curacao"),
    ("REU", r"reunion"),
    ("KGZ", r"kyrgyz"),
    ("BIH", r"bosnia|herzegovina"),
    ("TTO", r"trinidad|tobago"),
    ("ATG", r"antigua|barbuda"),
    ("ZAF", r"south africa"),
    ("CAF", r"central african"),
    ("ARE", r"united arab emirates|^uae$"),
    ("ESH", r"western sahara"),
    ("MNP", r"northern mariana"),
    ("JEY", r"jersey"),
    ("GGY", r"guernsey"),
    ("IMN", r"isle of man"),
    ("ALA", r"\baland\b"),
    ("AFG", r"afghan"),
    ("ALB", r"albania"),
    ("DZA", r"algeria"),
    ("AND", r"andorra"),
    ("AGO", r"angola"),
    ("AIA", r"anguilla"),
    ("ATA", r"antarctica"),
    ("ARG", r"argentin"),
    ("ARM", r"armenia"),
    ("ABW", r"aruba"),
    ("AUS", r"australia"),
    ("AUT", r"austria"),
    ("AZE", r"azerbaijan"),
    ("BHR", r"bahrain"),
    ("BGD", r"bangladesh"),
    ("BRB", r"barbados"),
    ("BLR", r"belarus"),
    ("BEL", r"belgium"),
    ("BLZ", r"belize"),
    ("BEN", r"benin"),
    ("BMU", r"bermuda"),
    ("BTN", r"bhutan"),
    ("BWA", r"botswana"),
    ("BVT", r"bouvet"),
    ("BRA", r"brazil"),
    ("BGR", r"bulgaria"),
    ("BFA", r"burkina"),
    ("BDI", r"burundi"),
    ("KHM", r"cambodia"),
    ("CMR", r"cameroon"),
    ("CAN", r"canada"),
    ("CYM", r"cayman"),
    ("TCD", r"\bchad\b"),
    ("CHL", r"\bchile\b"),
    ("CXR", r"christmas island"),
    ("CCK", r"cocos|keeling"),
    ("COL", r"colombia"),
    ("COM", r"comoros"),
    ("COK", r"cook islands"),
    ("CRI", r"costa rica"),
    ("HRV", r"croatia"),
    ("CUB", r"\bcuba\b"),
    ("CYP", r"cyprus"),
    ("DNK", r"denmark"),
    ("DJI", r"djibouti"),
    ("ECU", r"ecuador"),
    ("EGY", r"egypt"),
    ("SLV", r"el salvador"),
    ("ERI", r"eritrea"),
    ("EST", r"estonia"),
    ("ETH", r"ethiopia"),
    ("FRO", r"faeroe|faroe"),
    ("FJI", r"fiji"),
    ("FIN", r"finland"),
    ("GAB", r"gabon"),
    ("DEU", r"germany"),
    ("GHA", r"ghana"),
    ("GIB", r"gibraltar"),
    ("GRC", r"greece"),
    ("GRL", r"greenland"),
    ("GRD", r"grenada"),
    ("GLP", r"guadeloupe"),
    ("GUM", r"\bguam\b"),
    ("GTM", r"guatemala"),
    ("GUY", r"guyana"),
    ("HTI", r"haiti"),
    ("HND", r"honduras"),
    ("HUN", r"hungary"),
    ("ISL", r"iceland"),
    ("IND", r"\bindia\b"),
    ("IDN", r"indonesia"),
    ("IRQ", r"\biraq\b"),
    ("ISR", r"israel"),
    ("ITA", r"italy"),
    ("JAM", r"jamaica"),
    ("JPN", r"japan"),
    ("JOR", r"jordan"),
    ("KAZ", r"kazakh"),
    ("KEN", r"kenya"),
    ("KIR", r"kiribati"),
    ("KWT", r"kuwait"),
    ("LVA", r"latvia"),
    ("LBN", r"lebanon"),
    ("LSO", r"lesotho"),
    ("LBR", r"liberia"),
    ("LBY", r"libya"),
    ("LIE", r"liechtenstein"),
    ("LTU", r"lithuania"),
    ("LUX", r"luxembourg"),
    ("MDG", r"madagascar"),
    ("MWI", r"malawi"),
    ("MYS", r"malaysia"),
    ("MDV", r"maldives"),
    ("MLI", r"\bmali\b"),
    ("MLT", r"malta"),
    ("MHL", r"marshall islands"),
    ("MTQ", r"martinique"),
    ("MRT", r"mauritania"),
    ("MUS", r"mauritius"),
    ("MYT", r"mayotte"),
    ("MEX", r"mexico"),
    ("MCO", r"monaco"),
    ("MNG", r"mongolia"),
    ("MNE", r"montenegro"),
    ("MSR", r"montserrat"),
    ("MAR", r"morocco"),
    ("MOZ", r"mozambique"),
    ("NAM", r"namibia"),
    ("NRU", r"nauru"),
    ("NPL", r"nepal"),
    ("NCL", r"new caledonia"),
    ("NZL", r"new zealand"),
    ("NIC", r"nicaragua"),
    ("NIU", r"\bniue\b"),
    ("NFK", r"norfolk island"),
    ("NOR", r"norway"),
    ("OMN", r"\boman\b"),
    ("PAK", r"pakistan"),
    ("PLW", r"palau"),
    ("PAN", r"panama"),
    ("PRY", r"paraguay"),
    ("PER", r"\bperu\b"),
    ("PHL", r"philippines"),
    ("PCN", r"pitcairn"),
    ("POL", r"poland"),
    ("PRT", r"portugal"),
    ("PRI", r"puerto rico"),
    ("QAT", r"qatar"),
    ("ROU", r"r[ou]mania"),
    ("RWA", r"rwanda"),
    ("SMR", r"san marino"),
    ("SAU", r"saudi"),
    ("SEN", r"senegal"),
    ("SRB", r"serbia"),
    ("SYC", r"seychelles"),
    ("SLE", r"sierra leone"),
    ("SGP", r"singapore"),
    ("SVK", r"slovakia"),
    ("SVN", r"slovenia"),
    ("SLB", r"solomon islands"),
    ("SOM", r"somalia"),
    ("ESP", r"spain"),
    ("LKA", r"sri lanka"),
    ("SUR", r"suriname"),
    ("SJM", r"svalbard|jan mayen"),
    ("SWE", r"sweden"),
    ("CHE", r"switzerland"),
    ("TJK", r"tajik"),
    ("THA", r"thailand"),
    ("TGO", r"\btogo\b"),
    ("TKL", r"tokelau"),
    ("TON", r"\btonga\b"),
    ("TUN", r"tunisia"),
    ("TUR", r"turkey|turkiye"),
    ("TKM", r"turkmenistan"),
    ("TUV", r"tuvalu"),
    ("UGA", r"uganda"),
    ("UKR", r"ukraine"),
    ("URY", r"uruguay"),
    ("UZB", r"uzbekistan"),
    ("VUT", r"vanuatu"),
    ("YEM", r"yemen"),
    ("ZMB", r"zambia"),
    ("ZWE", r"zimbabwe"),
];

lazy_static! {
    static ref ALIAS_SET: RegexSet =
        RegexSet::new(ALIASES.iter().map(|(_, pattern)| *pattern)).expect("valid alias patterns");
}

/// Lower-case, fold common accents, `&` -> `and`, anything else that is not
/// alphanumeric becomes a single space.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        let c = match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'ç' => 'c',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ñ' => 'n',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ý' | 'ÿ' => 'y',
            other => other,
        };
        if c == '&' {
            out.push_str(" and ");
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push(' ');
        }
    }
    out.split_whitespace().join(" ")
}

/// Alias table lookup, first matching pattern wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexCountryResolver;

impl CountryResolver for RegexCountryResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return None;
        }
        ALIAS_SET
            .matches(&normalized)
            .iter()
            .next()
            .map(|i| ALIASES[i].0.to_string())
    }
}

/// Resolve every distinct name of `name_column` once and add the codes as
/// `country_code`.  Names that do not resolve keep a null code; they are
/// logged and returned.
pub fn add_country_codes(
    frame: &mut Frame,
    name_column: &str,
    resolver: &dyn CountryResolver,
) -> Result<Vec<String>> {
    let names = frame.require(name_column)?;
    let mapping: HashMap<&str, Option<String>> = names
        .values
        .iter()
        .filter_map(|v| v.as_str())
        .unique()
        .map(|name| (name, resolver.resolve(name)))
        .collect();
    let codes: Vec<Value> = names
        .values
        .iter()
        .map(|v| {
            v.as_str()
                .and_then(|name| mapping.get(name).cloned().flatten())
                .map_or(Value::Null, Value::Str)
        })
        .collect();
    let unresolved: Vec<String> = mapping
        .iter()
        .filter(|(_, code)| code.is_none())
        .map(|(name, _)| name.to_string())
        .sorted()
        .collect();
    info!(
        "resolved {} distinct names in column '{}'",
        mapping.len(),
        name_column
    );

    frame.push_column(COUNTRY_CODE_COLUMN, codes)?;
    if !unresolved.is_empty() {
        warn!(
            "no country code for {} names in '{}': {}",
            unresolved.len(),
            name_column,
            unresolved.join(", ")
        );
    }
    Ok(unresolved)
}
