//! End-to-end tests for seedgen.
//!
//! Each test drives the public API the way the CLI does: generate or search
//! for a mnemonic, derive its seed and master key, and export the key as WIF.
//! Deterministic entropy sources stand in for the system source wherever an
//! exact outcome is asserted.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use seedgen_core::entropy::{CollectionReport, WorkerKind, WorkerPlan};
use seedgen_core::keys;
use seedgen_core::search::{self, CustomRequest};
use seedgen_core::wif::{self, Network};
use seedgen_core::{
    CollectorConfig, EntropyCollector, EntropyProfile, EntropySource, Generator, GeneratorConfig,
    Mnemonic, SeedgenError, SystemEntropy, ValidationError, WordCount, WordList, WordListError,
};
use seedgen_tests::helpers::*;

const ZERO_12: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn fast_generator() -> Generator {
    Generator::english(GeneratorConfig::fast())
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn random_generation_pipeline() {
    let generator = fast_generator();

    for count in [WordCount::Twelve, WordCount::TwentyFour] {
        let (mnemonic, created) = generator.generate_random(count);
        assert_eq!(mnemonic.words().len(), count.words());
        assert!(generator.verify(&mnemonic));

        let report = generator.report(&mnemonic, created);
        assert_eq!(report.seed_hex.len(), 128);
        assert_eq!(report.private_key_hex.len(), 64);
        assert_eq!(report.chain_code_hex.len(), 64);

        let decoded = wif::decode_wif(&report.wif).unwrap();
        assert_eq!(hex::encode(decoded.private_key), report.private_key_hex);
        assert!(decoded.compressed);
        assert_eq!(decoded.network, Network::Mainnet);
    }
}

#[test]
fn successive_generations_differ() {
    let generator = fast_generator();
    let (a, _) = generator.generate_random(WordCount::Twelve);
    let (b, _) = generator.generate_random(WordCount::Twelve);
    assert_ne!(a, b);
}

#[test]
fn derivation_reproduces_report_from_text() {
    let generator = fast_generator();
    let (mnemonic, created) = generator.generate_random(WordCount::Twelve);
    let report = generator.report(&mnemonic, created);

    // Round trip through the textual forms the CLI prints and accepts.
    let parsed = Mnemonic::parse(&report.mnemonic).unwrap();
    let when = keys::parse_creation_time(&keys::format_creation_time(report.created_at)).unwrap();
    let (seed, master) = generator.derive(&parsed, when);
    assert_eq!(seed.to_hex(), report.seed_hex);
    assert_eq!(master.private_key_hex(), report.private_key_hex);
}

#[test]
fn golden_zero_vector_keys_are_stable() {
    let generator = fast_generator();
    let (mnemonic, _) = generator.generate_random_with(&mut ConstantSource::new(0), WordCount::Twelve);
    assert_eq!(mnemonic.to_string(), ZERO_12);

    let created = fixed_time(12, 0, 0);
    let reference = bip39::Mnemonic::parse_in(bip39::Language::English, ZERO_12)
        .unwrap()
        .to_seed_normalized("20240601120000");
    let (seed, master) = generator.derive(&mnemonic, created);
    assert_eq!(seed.as_bytes(), &reference);

    let expected_master = seedgen_core::MasterKey::from_seed_bytes(&reference);
    assert_eq!(master, expected_master);
}

#[test]
fn testnet_uncompressed_report() {
    let config = GeneratorConfig {
        network: Network::Testnet,
        compressed: false,
        ..GeneratorConfig::fast()
    };
    let generator = Generator::english(config);
    let (mnemonic, created) =
        generator.generate_random_with(&mut ConstantSource::new(0x7f), WordCount::Twelve);
    let report = generator.report(&mnemonic, created);
    assert!(report.wif.starts_with('9'));
    assert_eq!(report.network, Network::Testnet);
    assert!(!report.compressed);
}

#[test]
fn report_json_shape() {
    let generator = fast_generator();
    let (mnemonic, _) = generator.generate_random_with(&mut ConstantSource::new(0), WordCount::Twelve);
    let report = generator.report(&mnemonic, fixed_time(1, 2, 3));
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["mnemonic"], ZERO_12);
    assert_eq!(json["word_count"], 12);
    assert_eq!(json["created_at"], "2024-06-01T01:02:03");
    assert_eq!(json["network"], "mainnet");
    assert_eq!(json["compressed"], true);
    let back: seedgen_core::KeyReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}

// ---------------------------------------------------------------------------
// Custom search
// ---------------------------------------------------------------------------

#[test]
fn custom_search_exhausts_after_max_attempts() {
    let codec = english_codec();
    let request = CustomRequest::new(&["abandon"], &[12]);
    let mut source = ConstantSource::new(0);

    let err = search::search(&codec, &request, &mut source, 7).unwrap_err();
    assert_eq!(err, SeedgenError::Exhausted { attempts: 7 });
    assert_eq!(source.draws, 7);
}

#[test]
fn custom_search_returns_first_verifying_attempt() {
    // 0xff and 0x11 fill bytes fail the checksum with "about" in slot 12;
    // all-zero entropy passes.
    let codec = english_codec();
    let request = CustomRequest::new(&["about"], &[12]);
    let mut source = ScriptedSource::new([0xff, 0x11, 0x00]);

    let mnemonic = search::search(&codec, &request, &mut source, 10).unwrap();
    assert_eq!(source.draws, 3);
    assert_eq!(mnemonic.to_string(), ZERO_12);
}

#[test]
fn custom_search_validation_happens_before_drawing() {
    let codec = english_codec();
    let mut source = ConstantSource::new(0);
    let cases = [
        (
            CustomRequest::new(&["abandon"], &[0]),
            ValidationError::PositionOutOfRange { position: 0, max: 12 },
        ),
        (
            CustomRequest::new(&["abandon", "ability"], &[1]),
            ValidationError::CountMismatch { words: 2, positions: 1 },
        ),
        (
            CustomRequest::new(&["abandon", "ability"], &[3, 3]),
            ValidationError::DuplicatePosition(3),
        ),
        (
            CustomRequest::new(&["bitcoin"], &[1]),
            ValidationError::UnknownWord("bitcoin".into()),
        ),
    ];

    for (request, expected) in cases {
        let err = search::search(&codec, &request, &mut source, 1000).unwrap_err();
        assert_eq!(err, SeedgenError::Validation(expected));
    }
    assert_eq!(source.draws, 0);
}

#[test]
fn custom_search_with_live_entropy() {
    let generator = fast_generator();
    match generator.generate_custom(&["abandon"], &[1]) {
        Ok((mnemonic, _)) => {
            assert_eq!(mnemonic.word_at(1), Some("abandon"));
            assert_eq!(mnemonic.words().len(), 12);
            assert!(generator.verify(&mnemonic));
        }
        Err(e) => assert_eq!(e, SeedgenError::Exhausted { attempts: 1000 }),
    }
}

// ---------------------------------------------------------------------------
// Entropy collection
// ---------------------------------------------------------------------------

#[test]
fn collector_respects_budget() {
    let config = CollectorConfig {
        budget: Duration::from_millis(100),
        ..CollectorConfig::default()
    };
    let started = Instant::now();
    let (bytes, report): (Vec<u8>, CollectionReport) =
        EntropyCollector::new(config).collect_with_report(32);
    assert_eq!(bytes.len(), 32);
    assert!(report.workers >= 3);
    // Budget plus join grace plus scheduling slack.
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn collector_without_workers_still_fills_output() {
    let collector = EntropyCollector::new(CollectorConfig::padding_only());
    let (bytes, report) = collector.collect_with_report(16);
    assert_eq!(bytes.len(), 16);
    assert_eq!(report.samples, 0);
    assert!(report.padded);
    assert_ne!(collector.collect(16), bytes);
}

#[test]
fn collector_io_failure_falls_back() {
    let config = CollectorConfig {
        budget: Duration::from_secs(2),
        workers: WorkerPlan::Exact(vec![WorkerKind::Io, WorkerKind::Io]),
        temp_dir: Some(PathBuf::from("/nonexistent/seedgen-e2e")),
        ..CollectorConfig::default()
    };
    let (bytes, report) = EntropyCollector::new(config).collect_with_report(16);
    assert_eq!(bytes.len(), 16);
    assert_eq!(report.io_errors, 2);
}

#[test]
fn full_profile_source_draws_valid_entropy() {
    let mut source = SystemEntropy::new(
        EntropyProfile::Full,
        GeneratorConfig::fast().collector,
    );
    let codec = english_codec();
    let entropy = source.draw(WordCount::TwentyFour);
    assert_eq!(entropy.as_bytes().len(), 32);
    assert!(codec.verify(&codec.encode(&entropy)));
}

// ---------------------------------------------------------------------------
// Injected word-lists
// ---------------------------------------------------------------------------

#[test]
fn wordlist_file_round_trip() {
    let english = WordList::english();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for word in english.iter() {
        writeln!(file, "{word}").unwrap();
    }
    file.flush().unwrap();

    let loaded = WordList::from_file(file.path()).unwrap();
    assert_eq!(loaded.len(), 2048);
    assert_eq!(loaded.word(0), "abandon");
    assert_eq!(loaded.word(2047), "zoo");

    let generator = Generator::new(GeneratorConfig::fast(), Arc::new(loaded));
    let (mnemonic, _) = generator.generate_random_with(&mut ConstantSource::new(0), WordCount::Twelve);
    assert_eq!(mnemonic.to_string(), ZERO_12);
}

#[test]
fn short_wordlist_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "alpha\nbeta\ngamma").unwrap();
    let err = WordList::from_file(file.path()).unwrap_err();
    assert_eq!(err, WordListError::WrongLength { expected: 2048, got: 3 });
}

#[test]
fn reversed_wordlist_changes_encoding() {
    let english = WordList::english();
    let mut words: Vec<&str> = english.iter().collect();
    words.reverse();
    let reversed = WordList::parse(&words.join("\n")).unwrap();
    let generator = Generator::new(GeneratorConfig::fast(), Arc::new(reversed));

    let (mnemonic, _) = generator.generate_random_with(&mut ConstantSource::new(0), WordCount::Twelve);
    assert_eq!(mnemonic.word_at(1), Some("zoo"));
    assert!(generator.verify(&mnemonic));
    assert!(!fast_generator().verify(&mnemonic));
}
