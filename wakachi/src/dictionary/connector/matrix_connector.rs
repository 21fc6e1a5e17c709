//! 行列ベースのコネクター実装
//!
//! このモジュールは、接続コストを密な行列として保持し、
//! O(1)のルックアップを提供する行列ベースのコネクターを実装します。

use std::io::{prelude::*, BufReader, Read};

use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::connector::{ConnectorCost, ConnectorView};
use crate::errors::{Result, WakachiError};

/// 接続コストの行列
///
/// この構造体は、形態素間の接続コストを2次元行列として保持します。
/// 行列のインデックスは、左側形態素の右文脈IDと右側形態素の左文脈IDに
/// よって決定されます。
#[derive(Archive, Serialize, Deserialize)]
pub struct MatrixConnector {
    data: Vec<i16>,
    num_right: usize,
    num_left: usize,
}

impl MatrixConnector {
    /// 新しいインスタンスを作成します。
    ///
    /// # 引数
    ///
    /// * `data` - 接続コストデータの平坦化された配列
    /// * `num_right` - 右文脈IDの数
    /// * `num_left` - 左文脈IDの数
    pub const fn new(data: Vec<i16>, num_right: usize, num_left: usize) -> Self {
        Self {
            data,
            num_right,
            num_left,
        }
    }

    /// `matrix.def` から新しいインスタンスを作成します。
    ///
    /// # 引数
    ///
    /// * `rdr` - `matrix.def` ファイルのリーダー
    ///
    /// # 戻り値
    ///
    /// 成功時は `Ok(MatrixConnector)` を返します。
    ///
    /// # エラー
    ///
    /// ファイルフォーマットが不正な場合にエラーを返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let reader = BufReader::new(rdr);
        let mut lines = reader.lines();

        let (num_right, num_left) = if let Some(line) = lines.next() {
            let line = line?;
            Self::parse_header(&line)?
        } else {
            return Err(WakachiError::invalid_format("matrix.def", "must not be empty"));
        };

        let mut data = vec![0; num_right * num_left];
        for line in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let (right_id, left_id, cost) = Self::parse_body(&line)?;
            if num_right <= usize::from(right_id) || num_left <= usize::from(left_id) {
                let msg = format!("A connection id is out of range, {line}");
                return Err(WakachiError::invalid_format("matrix.def", msg));
            }
            data[usize::from(left_id) * num_right + usize::from(right_id)] = cost;
        }
        Ok(Self::new(data, num_right, num_left))
    }

    /// `matrix.def` のヘッダ行をパースし、右文脈IDと左文脈IDの数を返します。
    fn parse_header(line: &str) -> Result<(usize, usize)> {
        let cols: Vec<_> = line.split_whitespace().collect();
        if cols.len() != 2 {
            let msg = format!("The header must be num_right<space>num_left, {line}");
            Err(WakachiError::invalid_format("matrix.def", msg))
        } else {
            Ok((cols[0].parse()?, cols[1].parse()?))
        }
    }

    /// `matrix.def` の本体行をパースし、(右文脈ID, 左文脈ID, コスト) を返します。
    fn parse_body(line: &str) -> Result<(u16, u16, i16)> {
        let cols: Vec<_> = line.split_whitespace().collect();
        if cols.len() != 3 {
            let msg = format!("A row must be right_id<space>left_id<space>cost, {line}");
            Err(WakachiError::invalid_format("matrix.def", msg))
        } else {
            Ok((cols[0].parse()?, cols[1].parse()?, cols[2].parse()?))
        }
    }

    #[inline(always)]
    fn index(&self, right_id: u16, left_id: u16) -> usize {
        debug_assert!(usize::from(right_id) < self.num_right);
        debug_assert!(usize::from(left_id) < self.num_left);
        let index = usize::from(left_id) * self.num_right + usize::from(right_id);
        debug_assert!(index < self.data.len());
        index
    }
}

impl ConnectorView for MatrixConnector {
    #[inline(always)]
    fn num_left(&self) -> usize {
        self.num_left
    }

    #[inline(always)]
    fn num_right(&self) -> usize {
        self.num_right
    }
}

impl ConnectorCost for MatrixConnector {
    #[inline(always)]
    fn cost(&self, right_id: u16, left_id: u16) -> i32 {
        i32::from(self.data[self.index(right_id, left_id)])
    }
}

impl ArchivedMatrixConnector {
    #[inline(always)]
    fn index(&self, right_id: u16, left_id: u16) -> usize {
        let num_right = self.num_right.to_native() as usize;
        debug_assert!(usize::from(right_id) < num_right);
        debug_assert!(usize::from(left_id) < self.num_left.to_native() as usize);
        let index = usize::from(left_id) * num_right + usize::from(right_id);
        debug_assert!(index < self.data.len());
        index
    }
}

impl ConnectorView for ArchivedMatrixConnector {
    #[inline(always)]
    fn num_left(&self) -> usize {
        self.num_left.to_native() as usize
    }

    #[inline(always)]
    fn num_right(&self) -> usize {
        self.num_right.to_native() as usize
    }
}

impl ConnectorCost for ArchivedMatrixConnector {
    #[inline(always)]
    fn cost(&self, right_id: u16, left_id: u16) -> i32 {
        i32::from(self.data[self.index(right_id, left_id)].to_native())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATRIX_DEF: &str = "\
3 3
0 0 0
0 1 863
1 0 -3689
2 2 -2490";

    #[test]
    fn test_from_reader() {
        let conn = MatrixConnector::from_reader(MATRIX_DEF.as_bytes()).unwrap();
        assert_eq!(conn.num_right(), 3);
        assert_eq!(conn.num_left(), 3);
        assert_eq!(conn.cost(0, 0), 0);
        assert_eq!(conn.cost(0, 1), 863);
        assert_eq!(conn.cost(1, 0), -3689);
        assert_eq!(conn.cost(2, 2), -2490);
    }

    #[test]
    fn test_unset_cost_is_zero() {
        let conn = MatrixConnector::from_reader(MATRIX_DEF.as_bytes()).unwrap();
        assert_eq!(conn.cost(2, 1), 0);
    }

    #[test]
    fn test_empty_input() {
        let result = MatrixConnector::from_reader("".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_header() {
        let result = MatrixConnector::from_reader("3 3 3\n0 0 0".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_id() {
        let result = MatrixConnector::from_reader("2 2\n2 0 100".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_cost() {
        let result = MatrixConnector::from_reader("2 2\n0 0 コスト".as_bytes());
        assert!(result.is_err());
    }
}
