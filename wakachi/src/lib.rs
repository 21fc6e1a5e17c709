//! # Wakachi
//!
//! Wakachiは、ビタビアルゴリズムに基づく辞書駆動の日本語形態素解析器です。
//!
//! ## 概要
//!
//! このライブラリは、接続コスト最小化による格子探索で入力文を形態素列へ分割します。
//! rkyvシリアライゼーションフォーマットを使用することで、辞書の読み込みと初期化を
//! 高速化し、ゼロコピーでのデータアクセスを実現しています。
//!
//! ## 主な機能
//!
//! - **高速な形態素解析**: ビタビアルゴリズムを用いた効率的なトークン化
//! - **ゼロコピーデシリアライゼーション**: rkyvとメモリマップを使用した高速な辞書読み込み
//! - **3段階の分割単位**: 同一の探索結果から短単位・中単位・長単位を取り出し可能
//! - **入力正規化**: 小文字化とNFKCによる正規化、および元テキストへの位置射影
//! - **ユーザー辞書**: システム辞書に重ねる追加語彙の登録
//! - **zstd圧縮辞書**: 展開結果の検証付きキャッシュ
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use wakachi::{Mode, SystemDictionaryBuilder, Tokenizer};
//!
//! let lexicon_csv = "京都,0,0,5,名詞,固有名詞,地名,一般,キョウト,*,*,A,*
//! 東京,0,0,5,名詞,固有名詞,地名,一般,トウキョウ,*,*,A,*
//! 東京都,0,0,6,名詞,固有名詞,地名,一般,トウキョウト,*,*,B,1/3
//! 都,0,0,4,名詞,普通名詞,一般,*,ト,*,*,A,*";
//! let matrix_def = "1 1\n0 0 0";
//! let unk_def = "DEFAULT,0,0,100,補助記号,一般,*,*";
//!
//! let dict = SystemDictionaryBuilder::from_readers(
//!     lexicon_csv.as_bytes(),
//!     matrix_def.as_bytes(),
//!     unk_def.as_bytes(),
//! )?;
//!
//! let tokenizer = Tokenizer::from_inner(dict);
//! let mut worker = tokenizer.new_worker();
//!
//! worker.reset_sentence("京都東京都")?;
//! worker.tokenize(Mode::Medium)?;
//! assert_eq!(worker.num_tokens(), 2);
//!
//! let t0 = worker.token(0);
//! assert_eq!(t0.surface(), "京都");
//! assert_eq!(t0.range_char(), 0..2);
//! assert_eq!(t0.range_byte(), 0..6);
//! assert_eq!(t0.reading(), "キョウト");
//!
//! let t1 = worker.token(1);
//! assert_eq!(t1.surface(), "東京都");
//! assert_eq!(t1.range_char(), 2..5);
//! assert_eq!(t1.range_byte(), 6..15);
//!
//! // 短単位では登録された構成列に展開されます。
//! worker.tokenize(Mode::Short)?;
//! assert_eq!(worker.num_tokens(), 3);
//! assert_eq!(worker.token(1).surface(), "東京");
//! assert_eq!(worker.token(2).surface(), "都");
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// 共通の型定義とユーティリティ
pub mod common;

/// 辞書データ構造とビルダー
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 分割単位モードの定義
pub mod mode;

/// 数値型のユーティリティ
pub mod num;

/// 文の内部表現
mod sentence;

/// トークン型の定義
pub mod token;

/// トークナイザーの実装
pub mod tokenizer;

/// 内部ユーティリティ関数
pub mod utils;

#[cfg(test)]
mod tests;

// Re-exports
pub use dictionary::{CacheStrategy, Dictionary, LoadMode, SystemDictionaryBuilder};
pub use errors::{Result, WakachiError};
pub use mode::Mode;
pub use token::{Token, TokenBuf, TokenIter};
pub use tokenizer::worker::Worker;
pub use tokenizer::Tokenizer;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// このライブラリのバージョン番号を返します。
///
/// # 戻り値
///
/// `CARGO_PKG_VERSION`の文字列
pub const fn version() -> &'static str {
    VERSION
}
