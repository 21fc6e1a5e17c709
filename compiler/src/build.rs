//! システム辞書のビルドモジュール
//!
//! このモジュールは、辞書ソースファイル(lex.csv、matrix.def、unk.def)から
//! バイナリ形式のシステム辞書を構築する機能を提供します。
//! ユーザー辞書CSVを指定した場合は、構築時に辞書へ埋め込みます。

use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use wakachi::errors::WakachiError;
use wakachi::dictionary::DictionaryInner;
use wakachi::SystemDictionaryBuilder;

/// ビルドコマンドの引数
///
/// システム辞書をビルドするために必要な入力ファイルと出力先を指定します。
#[derive(Parser, Debug)]
#[command(name = "build", about = "A program to build the system dictionary.")]
pub struct Args {
    /// System lexicon file (lex.csv).
    #[arg(short = 'l', long)]
    lexicon_in: PathBuf,

    /// Matrix definition file (matrix.def).
    #[arg(short = 'm', long)]
    matrix_in: PathBuf,

    /// Unknown word definition file (unk.def).
    #[arg(short = 'u', long)]
    unk_in: PathBuf,

    /// User lexicon file (user.csv), embedded into the dictionary.
    #[arg(short = 'U', long)]
    userlex_in: Option<PathBuf>,

    /// File to which the binary dictionary is output (in zstd).
    #[arg(short = 'o', long)]
    sysdic_out: PathBuf,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書構築エラー
    #[error("Dictionary building failed: {0}")]
    Wakachi(#[from] WakachiError),
}

/// ビルドコマンドを実行する
///
/// 指定されたソースファイルから辞書を構築し、zstd圧縮したバイナリ形式で出力します。
///
/// # 引数
///
/// * `args` - ビルドコマンドの引数
///
/// # 戻り値
///
/// 成功時は`Ok(())`
///
/// # エラー
///
/// ファイルの読み書きや辞書構築に失敗した場合、`BuildError`を返します。
pub fn run(args: Args) -> Result<(), BuildError> {
    println!("Compiling the system dictionary...");
    let dict = build_dictionary(&args)?;

    println!("Writing the system dictionary...");
    let file = File::create(&args.sysdic_out)?;
    let mut encoder = zstd::Encoder::new(file, 19)?;
    dict.write(&mut encoder)?;
    encoder.finish()?;

    println!(
        "Successfully built the dictionary to {}",
        args.sysdic_out.display()
    );
    Ok(())
}

/// 指定されたソースファイルから辞書を構築する
///
/// CLIに依存しないコアのビルドロジックです。
///
/// # 引数
///
/// * `args` - ビルドコマンドの引数
///
/// # 戻り値
///
/// 構築された辞書の内部表現
///
/// # エラー
///
/// ファイルの読み込みや辞書構築に失敗した場合、`BuildError`を返します。
fn build_dictionary(args: &Args) -> Result<DictionaryInner, BuildError> {
    let mut dict = SystemDictionaryBuilder::from_readers(
        File::open(&args.lexicon_in)?,
        File::open(&args.matrix_in)?,
        File::open(&args.unk_in)?,
    )?;
    if let Some(userlex_in) = &args.userlex_in {
        println!("Embedding the user lexicon...");
        dict = dict.reset_user_lexicon_from_reader(Some(File::open(userlex_in)?))?;
    }
    Ok(dict)
}
