//! 辞書解凍モジュール
//!
//! このモジュールは、zstd圧縮された辞書をメモリマップ読み込みが可能な
//! 非圧縮のrkyv形式に戻す機能を提供します。解凍された辞書は
//! 整合性検証を経てから出力先へ配置されます。

use std::path::PathBuf;

use clap::Parser;
use wakachi::errors::WakachiError;
use wakachi::Dictionary;

/// 解凍コマンドの引数
#[derive(Parser, Debug)]
#[command(
    name = "decompress",
    about = "A program to decompress a zstd-compressed dictionary."
)]
pub struct Args {
    /// Compressed system dictionary (system.dic.zst).
    #[arg(short = 'i', long)]
    zstd_in: PathBuf,

    /// File to which the uncompressed dictionary is output.
    #[arg(short = 'o', long)]
    dic_out: PathBuf,
}

/// 解凍処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum DecompressError {
    /// 辞書解凍エラー
    #[error("Dictionary decompression failed: {0}")]
    Wakachi(#[from] WakachiError),
}

/// 解凍コマンドを実行する
///
/// zstd圧縮された辞書を解凍し、検証した上で出力先に書き込みます。
///
/// # 引数
///
/// * `args` - 解凍コマンドの引数
///
/// # 戻り値
///
/// 成功時は`Ok(())`
///
/// # エラー
///
/// 辞書の解凍や検証に失敗した場合、`DecompressError`を返します。
pub fn run(args: Args) -> Result<(), DecompressError> {
    println!("Decompressing the dictionary...");
    Dictionary::decompress_zstd(&args.zstd_in, &args.dic_out)?;

    println!(
        "Successfully decompressed the dictionary to {}",
        args.dic_out.display()
    );
    Ok(())
}
