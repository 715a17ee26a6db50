//! ISTAT region and province codes.
//!
//! The GSE layers are inconsistent about how they encode `COD_REG` and
//! `COD_PROV`: some records carry integers, others zero-padded strings. Every
//! incoming code is canonicalized to its zero-padded form before lookup, so
//! each table holds one entry per code.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Width of a canonical region code (`"05"`)
const REGION_WIDTH: usize = 2;
/// Width of a canonical province code (`"058"`)
const PROVINCE_WIDTH: usize = 3;

const REGION_FALLBACK: &str = "Regione";
const PROVINCE_FALLBACK: &str = "Provincia";

pub const REGIONS: [(&str, &str); 20] = [
    ("01", "Piemonte"),
    ("02", "Valle d'Aosta"),
    ("03", "Lombardia"),
    ("04", "Trentino-Alto Adige"),
    ("05", "Veneto"),
    ("06", "Friuli-Venezia Giulia"),
    ("07", "Liguria"),
    ("08", "Emilia-Romagna"),
    ("09", "Toscana"),
    ("10", "Umbria"),
    ("11", "Marche"),
    ("12", "Lazio"),
    ("13", "Abruzzo"),
    ("14", "Molise"),
    ("15", "Campania"),
    ("16", "Puglia"),
    ("17", "Basilicata"),
    ("18", "Calabria"),
    ("19", "Sicilia"),
    ("20", "Sardegna"),
];

pub const PROVINCES: [(&str, &str); 107] = [
    ("001", "Torino"),
    ("002", "Vercelli"),
    ("003", "Novara"),
    ("004", "Cuneo"),
    ("005", "Asti"),
    ("006", "Alessandria"),
    ("007", "Valle d'Aosta/Vallée d'Aoste"),
    ("008", "Imperia"),
    ("009", "Savona"),
    ("010", "Genova"),
    ("011", "La Spezia"),
    ("012", "Varese"),
    ("013", "Como"),
    ("014", "Sondrio"),
    ("015", "Milano"),
    ("016", "Bergamo"),
    ("017", "Brescia"),
    ("018", "Pavia"),
    ("019", "Cremona"),
    ("020", "Mantova"),
    ("021", "Bolzano/Bozen"),
    ("022", "Trento"),
    ("023", "Verona"),
    ("024", "Vicenza"),
    ("025", "Belluno"),
    ("026", "Treviso"),
    ("027", "Venezia"),
    ("028", "Padova"),
    ("029", "Rovigo"),
    ("030", "Udine"),
    ("031", "Gorizia"),
    ("032", "Trieste"),
    ("033", "Piacenza"),
    ("034", "Parma"),
    ("035", "Reggio nell'Emilia"),
    ("036", "Modena"),
    ("037", "Bologna"),
    ("038", "Ferrara"),
    ("039", "Ravenna"),
    ("040", "Forlì-Cesena"),
    ("041", "Pesaro e Urbino"),
    ("042", "Ancona"),
    ("043", "Macerata"),
    ("044", "Ascoli Piceno"),
    ("045", "Massa-Carrara"),
    ("046", "Lucca"),
    ("047", "Pistoia"),
    ("048", "Firenze"),
    ("049", "Livorno"),
    ("050", "Pisa"),
    ("051", "Arezzo"),
    ("052", "Siena"),
    ("053", "Grosseto"),
    ("054", "Perugia"),
    ("055", "Terni"),
    ("056", "Viterbo"),
    ("057", "Rieti"),
    ("058", "Roma"),
    ("059", "Latina"),
    ("060", "Frosinone"),
    ("061", "Caserta"),
    ("062", "Benevento"),
    ("063", "Napoli"),
    ("064", "Avellino"),
    ("065", "Salerno"),
    ("066", "L'Aquila"),
    ("067", "Teramo"),
    ("068", "Pescara"),
    ("069", "Chieti"),
    ("070", "Campobasso"),
    ("071", "Foggia"),
    ("072", "Bari"),
    ("073", "Taranto"),
    ("074", "Brindisi"),
    ("075", "Lecce"),
    ("076", "Potenza"),
    ("077", "Matera"),
    ("078", "Cosenza"),
    ("079", "Catanzaro"),
    ("080", "Reggio Calabria"),
    ("081", "Trapani"),
    ("082", "Palermo"),
    ("083", "Messina"),
    ("084", "Agrigento"),
    ("085", "Caltanissetta"),
    ("086", "Enna"),
    ("087", "Catania"),
    ("088", "Ragusa"),
    ("089", "Siracusa"),
    ("090", "Sassari"),
    ("091", "Nuoro"),
    ("092", "Cagliari"),
    ("093", "Pordenone"),
    ("094", "Isernia"),
    ("095", "Oristano"),
    ("096", "Biella"),
    ("097", "Lecco"),
    ("098", "Lodi"),
    ("099", "Rimini"),
    ("100", "Prato"),
    ("101", "Crotone"),
    ("102", "Vibo Valentia"),
    ("103", "Verbano-Cusio-Ossola"),
    ("108", "Monza e della Brianza"),
    ("109", "Fermo"),
    ("110", "Barletta-Andria-Trani"),
    ("111", "Sud Sardegna"),
];

/// Label used in place of a code the service sent as `null` or left out
const MISSING_CODE: &str = "n/d";

/// A region or province code as the service sent it: number, string or `null`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum AdminCode {
    Number(serde_json::Number),
    Text(String),
    #[default]
    Missing,
}

impl AdminCode {
    /// Zero-padded canonical form, or the trimmed raw text when the code is not numeric
    pub fn canonical(&self, width: usize) -> String {
        match self.numeric() {
            Some(n) => format!("{:0width$}", n, width = width),
            None => self.to_string().trim().to_string(),
        }
    }

    fn numeric(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            }),
            Self::Text(s) => {
                let s = s.trim();
                if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                    s.parse().ok()
                } else {
                    None
                }
            }
            Self::Missing => None,
        }
    }
}

impl fmt::Display for AdminCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
            Self::Missing => f.write_str(MISSING_CODE),
        }
    }
}

impl From<u64> for AdminCode {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for AdminCode {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Which table a code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Region,
    Province,
}

impl CodeKind {
    fn width(self) -> usize {
        match self {
            Self::Region => REGION_WIDTH,
            Self::Province => PROVINCE_WIDTH,
        }
    }

    fn fallback_prefix(self) -> &'static str {
        match self {
            Self::Region => REGION_FALLBACK,
            Self::Province => PROVINCE_FALLBACK,
        }
    }
}

/// Region and province name lookups, built once per resolver
#[derive(Debug, Clone)]
pub struct CodeTranslator {
    regions: HashMap<&'static str, &'static str>,
    provinces: HashMap<&'static str, &'static str>,
}

impl CodeTranslator {
    pub fn new() -> Self {
        Self {
            regions: REGIONS.iter().copied().collect(),
            provinces: PROVINCES.iter().copied().collect(),
        }
    }

    /// Translate a region code, falling back to `Regione <code>`
    pub fn region_name(&self, code: &AdminCode) -> String {
        self.translate(CodeKind::Region, code)
    }

    /// Translate a province code, falling back to `Provincia <code>`
    pub fn province_name(&self, code: &AdminCode) -> String {
        self.translate(CodeKind::Province, code)
    }

    pub fn translate(&self, kind: CodeKind, code: &AdminCode) -> String {
        let table = match kind {
            CodeKind::Region => &self.regions,
            CodeKind::Province => &self.provinces,
        };
        match table.get(code.canonical(kind.width()).as_str()) {
            Some(name) => (*name).to_string(),
            None => format!("{} {}", kind.fallback_prefix(), code),
        }
    }

    /// Canonical key used for lookups and deduplication
    pub fn canonical_key(kind: CodeKind, code: &AdminCode) -> String {
        code.canonical(kind.width())
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn province_count(&self) -> usize {
        self.provinces.len()
    }
}

impl Default for CodeTranslator {
    fn default() -> Self {
        Self::new()
    }
}
