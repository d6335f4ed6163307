extern crate dagparse;
extern crate tempfile;

mod test_utils;

mod tests {
    use std::fs;
    use std::io::Write as _;

    use tempfile::NamedTempFile;

    use dagparse::dataset::{self, Dataset};
    use dagparse::io::serialize::{self, Format, Serializer};
    use dagparse::io::Write;
    use dagparse::syntax::graph::Passage;
    use dagparse::syntax::transition::Config;

    use super::test_utils::mock;

    #[test]
    fn test_load_passages() {
        let passages = mock::all();
        let file = NamedTempFile::new().unwrap();
        let mut serializer = Serializer::<_, Passage>::new(file.reopen().unwrap(), Format::Json);
        serializer.write(&passages).unwrap();
        serializer.flush().unwrap();

        let loaded = dataset::load_passages(file.path()).unwrap();
        assert_eq!(loaded.len(), passages.len());
        for (original, read) in passages.iter().zip(&loaded) {
            assert_eq!(original, read);
        }

        let first_two = Dataset::<Passage>::load_until(file.path(), 2).unwrap();
        assert_eq!(first_two.len(), 2);
        assert_eq!(first_two[1].id(), "discontiguous");
    }

    #[test]
    fn test_passage_format() {
        let line = r#"{"id":"p1","tokens":[{"text":"Hi","punct":false,"paragraph":1},{"text":"!","punct":true,"paragraph":1}],"units":[{"implicit":false},{}],"edges":[{"parent":0,"child":3,"tag":"H"},{"parent":3,"child":1,"tag":"Terminal"},{"parent":3,"child":4,"tag":"U"},{"parent":4,"child":2,"tag":"Terminal","remote":false}]}"#;
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", line).unwrap();
        writeln!(file).unwrap();
        file.flush().unwrap();

        let loaded = dataset::load_passages(file.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        let passage = &loaded[0];
        assert_eq!(passage.id(), "p1");
        assert_eq!(passage.terminals(), &[1, 2]);
        assert!(passage.node(2).is_punct());
        assert_eq!(passage.units().count(), 2);
        assert!(passage.graph().is_punct_unit(4));
    }

    #[test]
    fn test_cyclic_passage_is_rejected() {
        let line = r#"{"id":"bad","tokens":[{"text":"a","punct":false,"paragraph":1}],"units":[{},{}],"edges":[{"parent":2,"child":3,"tag":"A"},{"parent":3,"child":2,"tag":"A"}]}"#;
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", line).unwrap();
        file.flush().unwrap();
        assert!(dataset::load_passages(file.path()).is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let passage = mock::remote_implicit();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passage.json");
        serialize::write_to(&path, &passage, Format::JsonPretty).unwrap();
        let restored: Passage = serialize::read_from(&path, Format::JsonPretty).unwrap();
        assert_eq!(restored, passage);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"compound_swap": true, "max_swap": 3}"#).unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(
            config,
            Config {
                compound_swap: true,
                max_swap: 3,
                ..Config::default()
            }
        );
        assert!(Config::from_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_dataset_shuffle_keeps_items() {
        let mut dataset = Dataset::from_items((0..20).collect::<Vec<u32>>());
        let mut rng = dagparse::utils::rand::rng_from_seed(7);
        dataset.shuffle(&mut rng);
        let mut items = dataset.into_items();
        items.sort();
        assert_eq!(items, (0..20).collect::<Vec<u32>>());
    }
}
