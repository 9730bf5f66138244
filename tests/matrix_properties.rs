use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use rust_rnn_textgen::Matrix;
use std::io::Cursor;

fn matrix_strategy() -> impl Strategy<Value = Matrix> {
    (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(-10.0f64..10.0, rows * cols)
            .prop_map(move |data| Matrix::from_vec(rows, cols, data).unwrap())
    })
}

fn matrix_pair_strategy() -> impl Strategy<Value = (Matrix, Matrix)> {
    (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
        (
            prop::collection::vec(-10.0f64..10.0, rows * cols),
            prop::collection::vec(-10.0f64..10.0, rows * cols),
        )
            .prop_map(move |(a, b)| {
                (
                    Matrix::from_vec(rows, cols, a).unwrap(),
                    Matrix::from_vec(rows, cols, b).unwrap(),
                )
            })
    })
}

proptest! {
    #[test]
    fn add_then_subtract_restores(pair in matrix_pair_strategy()) {
        let (a, b) = pair;
        let restored = a.add(&b).unwrap().subtract(&b).unwrap();
        prop_assert_eq!(restored.shape(), a.shape());
        for (x, y) in restored.as_slice().iter().zip(a.as_slice()) {
            prop_assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn transpose_twice_is_identity(m in matrix_strategy()) {
        let back = m.transpose().unwrap().transpose().unwrap();
        prop_assert_eq!(back, m);
    }

    #[test]
    fn mean_square_error_symmetric(pair in matrix_pair_strategy()) {
        let (a, b) = pair;
        let ab = Matrix::mean_square_error(&a, &b).unwrap();
        let ba = Matrix::mean_square_error(&b, &a).unwrap();
        prop_assert_eq!(ab, ba);
        prop_assert!(ab >= 0.0);
        prop_assert_eq!(Matrix::mean_square_error(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn text_format_keeps_six_decimals(m in matrix_strategy()) {
        let mut buf = Vec::new();
        m.save(&mut buf).unwrap();
        let loaded = Matrix::load(&mut Cursor::new(buf)).unwrap();
        prop_assert_eq!(loaded.shape(), m.shape());
        for (x, y) in loaded.as_slice().iter().zip(m.as_slice()) {
            prop_assert!((x - y).abs() <= 1e-6);
        }
    }
}

#[test]
fn test_dot_of_one_hot_selects_column() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let selected = m.dot(&Matrix::one_hot(3, 1).unwrap()).unwrap();
    assert_eq!(selected.shape(), (2, 1));
    assert_abs_diff_eq!(selected.get(0, 0).unwrap(), 2.0);
    assert_abs_diff_eq!(selected.get(1, 0).unwrap(), 5.0);
}
