//! 辞書圧縮モジュール
//!
//! このモジュールは、構築済みのrkyv形式辞書をzstd圧縮する機能を提供します。
//! 圧縮前に辞書を一度読み込んで検証するため、破損したファイルを
//! 配布物に変換してしまうことはありません。

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;
use wakachi::errors::WakachiError;
use wakachi::{Dictionary, LoadMode};

/// 圧縮コマンドの引数
#[derive(Parser, Debug)]
#[command(
    name = "compress",
    about = "A program to compress a built dictionary with zstd."
)]
pub struct Args {
    /// Uncompressed system dictionary (system.dic).
    #[arg(short = 'i', long)]
    dic_in: PathBuf,

    /// File to which the compressed dictionary is output (in zstd).
    #[arg(short = 'o', long)]
    zstd_out: PathBuf,

    /// Zstd compression level.
    #[arg(short = 'L', long, default_value_t = 19)]
    level: i32,
}

/// 圧縮処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum CompressError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書検証エラー
    #[error("Dictionary validation failed: {0}")]
    Wakachi(#[from] WakachiError),
}

/// 圧縮コマンドを実行する
///
/// 入力辞書を検証した後、zstd形式に圧縮して出力します。
///
/// # 引数
///
/// * `args` - 圧縮コマンドの引数
///
/// # 戻り値
///
/// 成功時は`Ok(())`
///
/// # エラー
///
/// 辞書の検証や読み書きに失敗した場合、`CompressError`を返します。
pub fn run(args: Args) -> Result<(), CompressError> {
    println!("Validating the dictionary...");
    let _ = Dictionary::from_path(&args.dic_in, LoadMode::Validate)?;

    println!(
        "Compressing the dictionary with zstd (level {})...",
        args.level
    );
    let reader = BufReader::new(File::open(&args.dic_in)?);
    let writer = File::create(&args.zstd_out)?;
    zstd::stream::copy_encode(reader, writer, args.level)?;

    println!(
        "Successfully compressed the dictionary to {}",
        args.zstd_out.display()
    );
    Ok(())
}
