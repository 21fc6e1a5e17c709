use rkyv::rancor::Error;

use crate::dictionary::connector::*;

const MATRIX_DEF: &str = "\
3 3
0 0 0
0 1 863
0 2 -320
1 0 -3689
1 1 57
1 2 14
2 0 212
2 1 -409
2 2 -2490";

/// 接続コスト行列の読み込みと取得機能のテスト
#[test]
fn test_matrix() {
    let conn = MatrixConnector::from_reader(MATRIX_DEF.as_bytes()).unwrap();
    assert_eq!(conn.num_left(), 3);
    assert_eq!(conn.num_right(), 3);
    assert_eq!(conn.cost(0, 0), 0);
    assert_eq!(conn.cost(0, 1), 863);
    assert_eq!(conn.cost(1, 0), -3689);
    assert_eq!(conn.cost(2, 1), -409);
    assert_eq!(conn.cost(2, 2), -2490);
}

/// アーカイブ形式の行列が元の行列と同じコストを返すことのテスト
#[test]
fn test_matrix_archived() {
    let conn = MatrixConnector::from_reader(MATRIX_DEF.as_bytes()).unwrap();
    let bytes = rkyv::to_bytes::<Error>(&conn).unwrap();
    let archived = rkyv::access::<ArchivedMatrixConnector, Error>(&bytes).unwrap();
    assert_eq!(archived.num_left(), conn.num_left());
    assert_eq!(archived.num_right(), conn.num_right());
    for right_id in 0..3 {
        for left_id in 0..3 {
            assert_eq!(archived.cost(right_id, left_id), conn.cost(right_id, left_id));
        }
    }
}
