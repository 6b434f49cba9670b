extern crate tbparser;
extern crate tempfile;

#[cfg(feature = "dataset-conll")]
use std::fs::File;
#[cfg(feature = "dataset-conll")]
use std::io::BufReader;
use std::io::{ErrorKind, Write};

#[cfg(feature = "dataset-conll")]
use tbparser::dataset::conll;
use tbparser::dataset::{json, Dataset, Example};
#[cfg(feature = "dataset-conll")]
use tbparser::io::prelude::*;
use tbparser::syntax::transition::{Error, GoldDefect, StaticOracle};
use tbparser::training::{self, AttachmentScore};
use tempfile::NamedTempFile;

static JSON_CORPUS: &'static str = r#"[
    {"words": ["the", "dog", "ran"], "tags": ["DT", "NN", "VBD"], "heads": {"0": 1, "2": 1}},
    {"words": ["hello", "world"], "tags": ["UH", "NN"], "heads": {}},
    {"words": ["She", "quickly", "ate", "the", "apple"], "heads": {"0": 2, "1": 2, "3": 4, "4": 2}}
]"#;

#[cfg(feature = "dataset-conll")]
static CONLL_CORPUS: &'static str = "# newdoc
1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_
2\tdog\tdog\tNOUN\tNN\t_\t3\tnsubj\t_\t_
3\tran\trun\tVERB\tVBD\t_\t0\troot\t_\t_

# sent_id = 2
1\tShe\tshe\tPRON\tPRP\t_\t3\tnsubj\t_\t_
2\tquickly\tquickly\tADV\tRB\t_\t3\tadvmod\t_\t_
3\tate\teat\tVERB\tVBD\t_\t0\troot\t_\t_
4\tthe\tthe\tDET\tDT\t_\t5\tdet\t_\t_
5\tapple\tapple\tNOUN\tNN\t_\t3\tobj\t_\t_
";

fn write_tempfile(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_json() {
    let file = write_tempfile(JSON_CORPUS);
    let dataset = json::load(file.path()).unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset[0].words, vec!["the", "dog", "ran"]);
    assert_eq!(dataset[0].heads.head(0), Some(1));
    assert_eq!(dataset[0].heads.head(1), None);
    assert!(dataset[1].heads.is_empty());
    assert!(dataset[2].tags.is_empty());
    assert_eq!(dataset[2].heads.len(), 4);
}

#[cfg(feature = "dataset-conll")]
#[test]
fn test_load_conll() {
    let file = write_tempfile(CONLL_CORPUS);
    let dataset = conll::load(file.path()).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset[0].words, vec!["The", "dog", "ran"]);
    assert_eq!(dataset[0].tags, vec!["DT", "NN", "VBD"]);
    assert_eq!(dataset[0].heads.head(0), Some(1));
    assert_eq!(dataset[0].heads.head(1), Some(2));
    assert_eq!(dataset[0].heads.head(2), None);
    assert_eq!(dataset[1].len(), 5);
    assert_eq!(dataset[1].heads.head(4), Some(2));
}

#[cfg(feature = "dataset-conll")]
#[test]
fn test_conll_matches_json() {
    let file = write_tempfile(CONLL_CORPUS);
    let from_conll = conll::load(file.path()).unwrap();
    let from_json = json::from_str(JSON_CORPUS).unwrap();
    assert_eq!(from_conll[1].heads, from_json[2].heads);
}

#[cfg(feature = "dataset-conll")]
#[test]
fn test_conll_reader_in_chunks() {
    let file = write_tempfile(CONLL_CORPUS);
    let mut reader = conll::Reader::<BufReader<File>>::open(file.path()).unwrap();
    let mut buf = vec![];
    assert_eq!(reader.read_upto(1, &mut buf).unwrap(), 1);
    assert_eq!(reader.read_upto(1, &mut buf).unwrap(), 1);
    assert_eq!(reader.read_upto(1, &mut buf).unwrap(), 0);
    assert_eq!(buf.len(), 2);
    assert_eq!(buf[1].words[0], "She");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert_eq!(json::load(&path).unwrap_err().kind(), ErrorKind::NotFound);
    #[cfg(feature = "dataset-conll")]
    assert_eq!(conll::load(&path).unwrap_err().kind(), ErrorKind::NotFound);
}

#[cfg(feature = "dataset-conll")]
#[test]
fn test_out_of_sequence_ids() {
    let file = write_tempfile("1\ta\ta\tX\tX\t_\t0\troot\t_\t_\n3\tb\tb\tX\tX\t_\t1\tdep\t_\t_\n");
    assert_eq!(
        conll::load(file.path()).unwrap_err().kind(),
        ErrorKind::InvalidData
    );
}

#[cfg(feature = "dataset-conll")]
#[test]
fn test_train_on_loaded_corpus() {
    let file = write_tempfile(CONLL_CORPUS);
    let dataset = conll::load(file.path()).unwrap();
    let mut score = AttachmentScore::new();
    training::train(&mut score, 2, &dataset).unwrap();
    assert_eq!(score.sentences(), 4);
    assert_eq!(score.accuracy(), Ok(1.0));
}

#[cfg(feature = "dataset-conll")]
#[test]
fn test_malformed_gold_is_loaded_but_rejected() {
    // token 2 is headed by a token the sentence does not have
    let file = write_tempfile("1\ta\ta\tX\tX\t_\t0\troot\t_\t_\n2\tb\tb\tX\tX\t_\t7\tdep\t_\t_\n");
    let dataset = conll::load(file.path()).unwrap();
    assert_eq!(
        dataset[0].heads.validate(dataset[0].len()),
        Err(Error::InvalidGoldStructure {
            dependent: 1,
            defect: GoldDefect::HeadOutOfRange(6),
        })
    );

    let corpus: Dataset<Example> = dataset;
    let config = training::Config {
        validate_gold: true,
        ..training::Config::default()
    };
    let mut score = AttachmentScore::new();
    let result = training::Trainer::with_config(StaticOracle, config).fit(&mut score, &corpus, 1);
    assert!(result.is_err());
    assert_eq!(score.sentences(), 0);
}

#[test]
fn test_train_on_json_corpus() {
    let file = write_tempfile(JSON_CORPUS);
    let corpus: Dataset<Example> = json::load(file.path()).unwrap();
    let mut score = AttachmentScore::new();
    training::train(&mut score, 1, &corpus).unwrap();
    assert_eq!(score.sentences(), 3);
    assert_eq!(score.accuracy(), Ok(1.0));

    let malformed = json::from_str(r#"[{"words": ["a", "b"], "heads": {"1": 1}}]"#).unwrap();
    let config = training::Config {
        validate_gold: true,
        ..training::Config::default()
    };
    let result = training::Trainer::with_config(StaticOracle, config).fit(&mut score, &malformed, 1);
    assert_eq!(
        result,
        Err(Error::InvalidGoldStructure {
            dependent: 1,
            defect: GoldDefect::SelfLoop,
        })
    );
    assert_eq!(score.sentences(), 3);
}
