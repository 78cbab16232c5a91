use freq::{entries, CountMode, Tally};
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let mut bytes = Tally::new(CountMode::Bytes);
            bytes.consume_slice(data);
            assert_eq!(bytes.table().total(), data.len() as u64);
            assert_eq!(bytes.errors(), 0);

            let mut text = Tally::new(CountMode::CodePoints);
            text.consume_slice(data);
            let mut last = None;
            for (key, count) in text.table().iter() {
                assert!(count > 0);
                assert!(last.map_or(true, |prev| prev < key));
                last = Some(key);
            }
            let rows = entries(&text).count();
            let expected = text.table().distinct() + usize::from(text.errors() > 0);
            assert_eq!(rows, expected);
        });
    }
}
