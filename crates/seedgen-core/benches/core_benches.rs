//! Criterion benchmarks for seedgen-core hot paths.
//!
//! Covers: mnemonic encode/verify, lane mixing, seed derivation and WIF
//! encoding.

use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use seedgen_core::entropy::{mix_lanes, Lane};
use seedgen_core::{keys, wif, Entropy, MasterKey, MnemonicCodec, WordList};

fn codec() -> MnemonicCodec {
    MnemonicCodec::new(Arc::new(WordList::english()))
}

fn bench_codec(c: &mut Criterion) {
    let codec = codec();
    let entropy = Entropy::from_slice(&[0x5A; 32]).unwrap();
    let mnemonic = codec.encode(&entropy);

    c.bench_function("encode_24_words", |b| b.iter(|| codec.encode(black_box(&entropy))));
    c.bench_function("verify_24_words", |b| b.iter(|| codec.verify(black_box(&mnemonic))));
}

fn bench_mix(c: &mut Criterion) {
    let lanes: Vec<Lane> = (0u8..12)
        .map(|i| Lane::new("bench", vec![i; if i % 2 == 0 { 8 } else { 32 }]))
        .collect();

    c.bench_function("mix_12_lanes", |b| b.iter(|| mix_lanes(black_box(&lanes), 32)));
}

fn bench_derive(c: &mut Criterion) {
    let codec = codec();
    let mnemonic = codec.encode(&Entropy::from_slice(&[0u8; 16]).unwrap());
    let created = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    c.bench_function("pbkdf2_seed_2048_rounds", |b| {
        b.iter(|| keys::derive_seed(black_box(&mnemonic), created))
    });
    c.bench_function("master_key_from_seed", |b| {
        b.iter(|| MasterKey::from_seed_bytes(black_box(&[0x42; 64])))
    });
}

fn bench_wif(c: &mut Criterion) {
    let key = [0x0Cu8; 32];
    let encoded = wif::encode_wif(&key, true, false);

    c.bench_function("wif_encode", |b| b.iter(|| wif::encode_wif(black_box(&key), true, false)));
    c.bench_function("wif_decode", |b| b.iter(|| wif::decode_wif(black_box(&encoded)).unwrap()));
}

criterion_group!(benches, bench_codec, bench_mix, bench_derive, bench_wif);
criterion_main!(benches);
