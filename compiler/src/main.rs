//! Wakachi 辞書コンパイラのメインエントリーポイント
//!
//! このモジュールは、形態素解析用の辞書を構築するためのサブコマンドを提供します。
//! ソースファイルからのバイナリ辞書の構築、構築済み辞書のzstd圧縮・解凍など、
//! 辞書の配布準備に関する操作を統合したCLIツールです。

mod build;
mod compress;
mod decompress;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::build::BuildError;
use crate::compress::CompressError;
use crate::decompress::DecompressError;

/// コマンドライン引数の構造体
///
/// `clap`を使用してコマンドライン引数をパースします。
#[derive(Parser, Debug)]
#[command(name = "wakachi-compiler", version)]
struct Cli {
    /// 実行するサブコマンド
    #[command(subcommand)]
    command: Command,
}

/// 利用可能なサブコマンド
///
/// 各サブコマンドは辞書の配布準備プロセスの異なるフェーズに対応します。
#[derive(Subcommand, Debug)]
enum Command {
    /// ソースファイルからバイナリ辞書を構築します
    ///
    /// 辞書ソースファイル(lex.csv、matrix.def、unk.def)からzstd圧縮された
    /// バイナリ形式の辞書を生成します。
    Build(build::Args),

    /// 構築済みのバイナリ辞書をzstd圧縮します
    ///
    /// 非圧縮のrkyv形式辞書を検証した上で、配布用のzstd形式に変換します。
    Compress(compress::Args),

    /// zstd圧縮された辞書を解凍します
    ///
    /// 配布用のzstd形式辞書を、メモリマップ読み込みが可能な非圧縮形式に戻します。
    Decompress(decompress::Args),
}

/// コンパイラの実行中に発生する可能性のあるエラー
///
/// 各サブコマンドで発生したエラーをラップします。
#[derive(Debug, Error)]
pub enum CompileError {
    /// 辞書ビルド中のエラー
    #[error(transparent)]
    Build(#[from] BuildError),
    /// 辞書圧縮中のエラー
    #[error(transparent)]
    Compress(#[from] CompressError),
    /// 辞書解凍中のエラー
    #[error(transparent)]
    Decompress(#[from] DecompressError),
}

/// メイン関数
///
/// コマンドライン引数をパースし、指定されたサブコマンドを実行します。
///
/// # 戻り値
///
/// 実行が成功した場合は`Ok(())`、失敗した場合は対応する`CompileError`を返します。
///
/// # エラー
///
/// 各サブコマンドの実行中にエラーが発生した場合、そのエラーが返されます。
fn main() -> Result<(), CompileError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => Ok(build::run(args)?),
        Command::Compress(args) => Ok(compress::run(args)?),
        Command::Decompress(args) => Ok(decompress::run(args)?),
    }
}
