//! Source package metadata

use itertools::Itertools;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Serialize a list in lexicographic order without touching the stored order
fn sorted<S: Serializer>(values: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().sorted())
}

/// Header metadata of a spec file's main package
///
/// Scalar fields default to the empty string and are omitted from the
/// serialized form while empty, as are empty lists and maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageSource {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub release: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub epoch: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub license: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub buildarch: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub excludearch: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub exclusivearch: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub packager: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vcs: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub buildroot: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vendor: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub autoreq: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub autoreqprov: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub autoprov: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bugurl: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub distribution: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub disttag: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub modularitylabel: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub nosource: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub nopatch: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub copyright: String,

    /// `SourceN` headers keyed by the literal directive token
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<String, String>,

    /// `PatchN` headers keyed by the literal directive token
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub patches: BTreeMap<String, String>,

    /// Body of the main `%description`, one entry per line
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "sorted")]
    pub buildrequires: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "sorted")]
    pub requires: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "sorted")]
    pub provides: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "sorted")]
    pub conflicts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "sorted")]
    pub obsoletes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "sorted")]
    pub buildconflicts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "sorted")]
    pub recommends: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "sorted")]
    pub suggests: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "sorted")]
    pub supplements: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "sorted")]
    pub enhances: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "sorted")]
    pub orderwithrequires: Vec<String>,
}

impl PackageSource {
    /// Relation list for a lower-cased field name
    pub fn relation_mut(&mut self, field: &str) -> Option<&mut Vec<String>> {
        let list = match field {
            "requires" => &mut self.requires,
            "buildrequires" => &mut self.buildrequires,
            "provides" => &mut self.provides,
            "conflicts" => &mut self.conflicts,
            "obsoletes" => &mut self.obsoletes,
            "buildconflicts" => &mut self.buildconflicts,
            "recommends" => &mut self.recommends,
            "suggests" => &mut self.suggests,
            "supplements" => &mut self.supplements,
            "enhances" => &mut self.enhances,
            "orderwithrequires" => &mut self.orderwithrequires,
            _ => return None,
        };
        Some(list)
    }

    /// Scalar field for a lower-cased field name
    pub fn scalar_mut(&mut self, field: &str) -> Option<&mut String> {
        let value = match field {
            "name" => &mut self.name,
            "version" => &mut self.version,
            "release" => &mut self.release,
            "epoch" => &mut self.epoch,
            "summary" => &mut self.summary,
            "group" => &mut self.group,
            "license" => &mut self.license,
            "url" => &mut self.url,
            "buildarch" => &mut self.buildarch,
            "excludearch" => &mut self.excludearch,
            "exclusivearch" => &mut self.exclusivearch,
            "packager" => &mut self.packager,
            "vcs" => &mut self.vcs,
            "buildroot" => &mut self.buildroot,
            "vendor" => &mut self.vendor,
            "prefix" => &mut self.prefix,
            "autoreq" => &mut self.autoreq,
            "autoreqprov" => &mut self.autoreqprov,
            "autoprov" => &mut self.autoprov,
            "bugurl" => &mut self.bugurl,
            "distribution" => &mut self.distribution,
            "disttag" => &mut self.disttag,
            "icon" => &mut self.icon,
            "modularitylabel" => &mut self.modularitylabel,
            "nosource" => &mut self.nosource,
            "nopatch" => &mut self.nopatch,
            "copyright" => &mut self.copyright,
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let mut package = PackageSource::default();
        *package.scalar_mut("name").unwrap() = "bash".to_string();
        package.relation_mut("requires").unwrap().push("glibc".to_string());

        assert_eq!(package.name, "bash");
        assert_eq!(package.requires, vec!["glibc"]);
        assert!(package.scalar_mut("requires").is_none());
        assert!(package.relation_mut("name").is_none());
        assert!(package.scalar_mut("Name").is_none());
    }

    #[test]
    fn test_relations_serialize_sorted() {
        let package = PackageSource {
            requires: vec!["zlib".to_string(), "bash".to_string()],
            description: vec!["Second line".to_string(), "A first line".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(json["requires"], serde_json::json!(["bash", "zlib"]));
        // prose keeps its order
        assert_eq!(
            json["description"],
            serde_json::json!(["Second line", "A first line"])
        );
        // stored order is untouched
        assert_eq!(package.requires, vec!["zlib", "bash"]);
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let package = PackageSource {
            name: "bash".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "bash" }));
    }
}
