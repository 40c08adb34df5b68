use chrono::{DateTime, Utc};
use kimchi_core::timeseries::rolling::{ma_column, trailing_mean};
use kimchi_core::{AlignedTable, Column, add_moving_averages};
use proptest::prelude::*;

fn arb_table() -> impl Strategy<Value = AlignedTable> {
    (1usize..80).prop_flat_map(|rows| {
        proptest::collection::vec(
            proptest::collection::vec(proptest::option::weighted(0.8, -50.0f64..50.0), rows),
            1..4,
        )
        .prop_map(move |cols| {
            let index: Vec<DateTime<Utc>> = (0..rows as i64)
                .map(|h| DateTime::from_timestamp(h * 3_600, 0).unwrap())
                .collect();
            let columns = cols
                .into_iter()
                .enumerate()
                .map(|(i, values)| Column::new(format!("A{i}_premium"), values))
                .collect();
            AlignedTable::new(index, columns).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn second_pass_changes_nothing(table in arb_table(), windows in proptest::collection::vec(1usize..30, 1..4)) {
        let once = add_moving_averages(&table, &windows).unwrap();
        let twice = add_moving_averages(&once, &windows).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn base_columns_are_untouched(table in arb_table()) {
        let out = add_moving_averages(&table, &[24, 168]).unwrap();
        prop_assert_eq!(out.width(), table.width() * 3);
        for c in table.columns() {
            prop_assert_eq!(out.column(c.name()).unwrap(), c.values());
            let expected_ma = trailing_mean(c.values(), 24);
            prop_assert_eq!(
                out.column(&ma_column(c.name(), 24)).unwrap(),
                expected_ma.as_slice()
            );
        }
    }

    #[test]
    fn first_cell_of_ma_equals_first_value(values in proptest::collection::vec(-10.0f64..10.0, 1..40), w in 1usize..50) {
        let cells: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
        let ma = trailing_mean(&cells, w);
        prop_assert_eq!(ma[0], Some(values[0]));
    }
}
