use std::collections::HashSet;

use crate::api::{Municipality, PodResult, SubstationDetail};
use crate::istat::{AdminCode, CodeKind, CodeTranslator};
use crate::pod::PodCode;

const SEPARATOR: &str = ", ";

/// Translate codes once each, in first-seen order.
///
/// Codes are compared in canonical form, so `12` and `"12"` count once.
pub fn unique_names<'a>(
    codes: impl IntoIterator<Item = &'a AdminCode>,
    kind: CodeKind,
    translator: &CodeTranslator,
) -> Vec<String> {
    let mut seen = HashSet::new();
    codes
        .into_iter()
        .filter(|code| seen.insert(CodeTranslator::canonical_key(kind, code)))
        .map(|code| translator.translate(kind, code))
        .collect()
}

/// Build the result record from the substation and its municipalities.
///
/// Municipality names are kept verbatim, duplicates included.
pub fn aggregate(
    pod: &PodCode,
    detail: &SubstationDetail,
    municipalities: &[Municipality],
    translator: &CodeTranslator,
) -> PodResult {
    let regions = unique_names(
        municipalities.iter().map(|m| &m.region_code),
        CodeKind::Region,
        translator,
    );
    let provinces = unique_names(
        municipalities.iter().map(|m| &m.province_code),
        CodeKind::Province,
        translator,
    );
    let names: Vec<&str> = municipalities.iter().map(|m| m.name.as_str()).collect();

    PodResult {
        pod: pod.to_string(),
        substation: detail.id.to_string(),
        supplier: detail.supplier.clone(),
        regions: regions.join(SEPARATOR),
        provinces: provinces.join(SEPARATOR),
        municipalities: names.join(SEPARATOR),
    }
}
