//! 共通の型定義とユーティリティ
//!
//! このモジュールは、ライブラリ全体で共有される定数を定義します。

/// 入力文の最大長(正規化後の文字数)
///
/// この長さを超える入力は、ラティス構築の前に
/// [`InvalidInputError`](crate::errors::InvalidInputError)として拒否されます。
pub const MAX_SENTENCE_LENGTH: usize = 0xFFFF;

/// 文頭(BOS)および文末(EOS)の仮想ノードに割り当てられる接続ID
pub const BOS_EOS_CONNECTION_ID: u16 = 0;
