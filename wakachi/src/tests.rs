//! Wakachiのテストモジュール群
//!
//! コンポーネント単体では捉えにくい、接続行列と格子探索の組み合わせ
//! 動作を検証するシナリオテストを含みます。

mod connector;
