#[cfg(test)]
mod tests {
    use super::super::*;
    use oncograph_kg::adapters::oncodash::OncodashEdgeType;
    use oncograph_kg::adapters::oncokb::OncoKbField;
    use oncograph_kg::adapters::variants::VariantsNodeType;
    use pretty_assertions::assert_eq;

    const TOML: &str = r#"
[output]
dir = "out"
merge_policy = "last_write_wins"

[variants]
path = "data/variants.tsv"

[variants.settings]
node_types = ["variant", "sample"]

[oncokb]
path = "/data/oncokb.tsv"

[oncokb.settings]
fields = ["Gene", "Drugs (for therapeutic implications only)"]
"#;

    const YAML: &str = r#"
output:
  dir: out
  merge_policy: last_write_wins
variants:
  path: data/variants.tsv
  settings:
    node_types: [variant, sample]
oncokb:
  path: /data/oncokb.tsv
  settings:
    fields: ["Gene", "Drugs (for therapeutic implications only)"]
"#;

    #[test]
    fn test_toml_and_yaml_agree() {
        let from_toml = Config::parse(TOML, Path::new("oncograph.toml")).unwrap();
        let from_yaml = Config::parse(YAML, Path::new("oncograph.yaml")).unwrap();
        assert_eq!(from_toml, from_yaml);
    }

    #[test]
    fn test_omitted_settings_select_everything() {
        let config = Config::parse(TOML, Path::new("oncograph.toml")).unwrap();
        let variants = config.variants.unwrap();
        assert_eq!(variants.settings.node_types, vec![VariantsNodeType::Variant, VariantsNodeType::Sample]);
        // Lists the file does not mention keep their defaults.
        assert_eq!(variants.settings.edge_types, VariantsSettings::default().edge_types);

        let oncokb = config.oncokb.unwrap();
        assert_eq!(oncokb.settings.fields, vec![OncoKbField::Gene, OncoKbField::Drugs]);
        assert_eq!(oncokb.settings.node_types, OncoKbSettings::default().node_types);
    }

    #[test]
    fn test_absent_sections_disable_adapters() {
        let config = Config::parse(TOML, Path::new("oncograph.toml")).unwrap();
        assert!(config.copy_number.is_none());
        assert!(config.clinical.is_none());
        assert_eq!(config.enabled_sources(), vec!["variants", "oncokb"]);
    }

    #[test]
    fn test_output_defaults() {
        let config = Config::parse("[clinical]\npath = \"c.csv\"\n", Path::new("x.toml")).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("./graph"));
        assert_eq!(config.output.merge_policy, MergePolicy::ErrorOnConflict);
        assert_eq!(config.clinical.unwrap().settings, ClinicalSettings::default());
    }

    #[test]
    fn test_unknown_field_name_rejected() {
        let bad = "[oncokb]\npath = \"o.tsv\"\n[oncokb.settings]\nfields = [\"Genes\"]\n";
        assert!(Config::parse(bad, Path::new("x.toml")).is_err());
    }

    #[test]
    fn test_load_rebases_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oncograph.toml");
        std::fs::write(&path, TOML).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.variants.unwrap().path, dir.path().join("data/variants.tsv"));
        assert_eq!(config.oncokb.unwrap().path, PathBuf::from("/data/oncokb.tsv"));
    }

    #[test]
    fn test_oncodash_section_takes_two_files() {
        let text = "\
[oncodash]
nodes = \"oncodash/BiologicalProcess-part000.csv\"
edges = \"oncodash/GeneToBiologicalProcess-part000.csv\"

[oncodash.settings]
node_types = []
";
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oncograph.toml");
        std::fs::write(&path, text).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.enabled_sources(), vec!["oncodash"]);
        let oncodash = config.oncodash.unwrap();
        assert_eq!(oncodash.nodes, dir.path().join("oncodash/BiologicalProcess-part000.csv"));
        assert_eq!(oncodash.edges, dir.path().join("oncodash/GeneToBiologicalProcess-part000.csv"));
        assert!(oncodash.settings.node_types.is_empty());
        assert_eq!(oncodash.settings.edge_types, vec![OncodashEdgeType::GeneToProcess]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_example_config_parses() {
        let example = include_str!("../../../../oncograph.example.toml");
        let config = Config::parse(example, Path::new("oncograph.example.toml")).unwrap();
        assert_eq!(config.enabled_sources(), vec!["variants", "copy_number", "clinical", "oncokb", "oncodash"]);
        assert_eq!(config.variants.unwrap().settings, VariantsSettings::default());
    }
}
