//! 辞書読み込みのベンチマーク
//!
//! rkyv形式辞書の読み込み速度を計測します。from_path、read、from_zstdの
//! 各種読み込み方法を、ウォームキャッシュと初回実行の2つの状態で測定します。

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use tempfile::TempDir;
use wakachi::{CacheStrategy, Dictionary, LoadMode, SystemDictionaryBuilder};

struct BencherContext {
    _run_dir: TempDir,
    dict_path: PathBuf,
    zstd_path: PathBuf,
    dict_bytes: Vec<u8>,
    local_cache_dir: PathBuf,
}

impl BencherContext {
    fn new() -> Self {
        // 読み込み側の処理を測るため、語彙は機械的に生成する。
        let mut lexicon_csv = String::new();
        for i in 0..2000 {
            let left = i % 3;
            let right = (i / 3) % 3;
            let cost = 2000 + (i % 997);
            writeln!(
                &mut lexicon_csv,
                "単語{i:04},{left},{right},{cost},名詞,普通名詞,一般,*,タンゴ,*,*,A,*"
            )
            .unwrap();
        }
        let matrix_def = "\
3 3
0 0 0
0 1 100
0 2 -100
1 0 50
1 1 0
1 2 25
2 0 -50
2 1 75
2 2 0";
        let unk_def = "DEFAULT,0,0,4000,記号,一般,*,*";

        let dict = SystemDictionaryBuilder::from_readers(
            lexicon_csv.as_bytes(),
            matrix_def.as_bytes(),
            unk_def.as_bytes(),
        )
        .expect("failed to build the benchmark dictionary");

        let mut dict_bytes = Vec::new();
        dict.write(&mut dict_bytes)
            .expect("failed to serialize the benchmark dictionary");

        let run_dir = tempfile::tempdir().expect("failed to create the run directory");
        let dict_path = run_dir.path().join("system.dic");
        fs::write(&dict_path, &dict_bytes).expect("failed to write the dictionary");

        let zstd_path = run_dir.path().join("system.dic.zst");
        let compressed = zstd::stream::encode_all(dict_bytes.as_slice(), 0)
            .expect("failed to compress the dictionary");
        fs::write(&zstd_path, compressed).expect("failed to write the compressed dictionary");

        let local_cache_dir = run_dir.path().join(".cache");

        Self {
            _run_dir: run_dir,
            dict_path,
            zstd_path,
            dict_bytes,
            local_cache_dir,
        }
    }

    fn clear_local_cache(&self) {
        if self.local_cache_dir.exists() {
            fs::remove_dir_all(&self.local_cache_dir).unwrap();
        }
    }
}

fn bench_dictionary_load(c: &mut Criterion) {
    let ctx = BencherContext::new();
    let file_size = fs::metadata(&ctx.dict_path).unwrap().len();

    let mut group = c.benchmark_group("Dictionary Load");
    group.throughput(Throughput::Bytes(file_size));
    group.warm_up_time(Duration::from_secs(1));

    group.sample_size(50);
    group.bench_function("from_path/validate/warm", |b| {
        b.iter(|| {
            std::hint::black_box(Dictionary::from_path(&ctx.dict_path, LoadMode::Validate).unwrap())
        })
    });

    group.bench_function("from_path/trust_cache/warm", |b| {
        let _ = Dictionary::from_path(&ctx.dict_path, LoadMode::TrustCache).unwrap();
        b.iter(|| {
            std::hint::black_box(
                Dictionary::from_path(&ctx.dict_path, LoadMode::TrustCache).unwrap(),
            )
        })
    });

    group.bench_function("read/in_memory", |b| {
        b.iter(|| std::hint::black_box(Dictionary::read(ctx.dict_bytes.as_slice()).unwrap()))
    });

    group.sample_size(30);
    group.bench_function("from_zstd/cached/warm", |b| {
        let _ = Dictionary::from_zstd(&ctx.zstd_path, CacheStrategy::Local).unwrap();
        b.iter(|| {
            std::hint::black_box(Dictionary::from_zstd(&ctx.zstd_path, CacheStrategy::Local).unwrap())
        })
    });

    group.sample_size(10);
    group.bench_function("from_zstd/1st_run", |b| {
        b.iter_with_setup(
            || ctx.clear_local_cache(),
            |_| Dictionary::from_zstd(&ctx.zstd_path, CacheStrategy::Local).unwrap(),
        )
    });

    group.finish();
}

criterion_group!(benches, bench_dictionary_load);
criterion_main!(benches);
