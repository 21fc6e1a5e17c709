//! 接続コスト計算のためのコネクター
//!
//! このモジュールは、形態素間の接続コストを計算するための
//! コネクター実装を提供します。

mod matrix_connector;

pub use crate::dictionary::connector::matrix_connector::{
    ArchivedMatrixConnector, MatrixConnector,
};

/// コネクターのビュー機能を提供するトレイト
pub trait ConnectorView {
    /// 左接続IDの最大数を返します。
    fn num_left(&self) -> usize;

    /// 右接続IDの最大数を返します。
    fn num_right(&self) -> usize;
}

/// 接続コスト計算機能を提供するトレイト
pub trait ConnectorCost: ConnectorView {
    /// 接続行列の値を取得します。
    ///
    /// # 引数
    ///
    /// * `right_id` - 左側形態素の右文脈ID
    /// * `left_id` - 右側形態素の左文脈ID
    ///
    /// # 戻り値
    ///
    /// 接続コスト
    fn cost(&self, right_id: u16, left_id: u16) -> i32;
}
