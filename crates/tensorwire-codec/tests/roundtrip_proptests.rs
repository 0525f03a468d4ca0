//! Property tests: serialization equals row-major gathering for arbitrary
//! layouts, independent of sharing mode, and records survive their framing.

use proptest::prelude::*;
use tensorwire_buffer::SharedBuf;
use tensorwire_codec::layout::row_major_strides;
use tensorwire_codec::{serialize, DataType, Endianness, SharingMode, WireTensor};

const ALL_MODES: [SharingMode; 3] =
    [SharingMode::None, SharingMode::ManagedOnly, SharingMode::All];

/// Reference semantics: visit the logical elements in row-major order and
/// collect them, one stride-addressed element at a time.
fn row_major_gather(elems: &[i32], sizes: &[usize], strides: &[isize]) -> Vec<i32> {
    if sizes.is_empty() {
        return Vec::new();
    }
    let total: usize = sizes.iter().product();
    let mut out = Vec::with_capacity(total);
    for lin in 0..total {
        let mut rem = lin;
        let mut off: isize = 0;
        for d in (0..sizes.len()).rev() {
            let idx = rem % sizes[d];
            rem /= sizes[d];
            off += idx as isize * strides[d];
        }
        out.push(elems[usize::try_from(off).expect("offset in bounds")]);
    }
    out
}

/// A base shape plus a permutation of its axes.
fn shape_and_permutation() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    proptest::collection::vec(0usize..4, 1..=4).prop_flat_map(|shape| {
        let axes: Vec<usize> = (0..shape.len()).collect();
        (Just(shape), Just(axes).prop_shuffle())
    })
}

proptest! {
    /// Any axis permutation of a contiguous tensor serializes to exactly the
    /// row-major gather of the permuted view, in every sharing mode.
    #[test]
    fn permuted_views_serialize_to_row_major_gather(
        (shape, perm) in shape_and_permutation()
    ) {
        let total: usize = shape.iter().product();
        let elems: Vec<i32> = (0..total as i32).collect();
        let base_strides = row_major_strides(&shape);

        let view_sizes: Vec<usize> = perm.iter().map(|&ax| shape[ax]).collect();
        let view_strides: Vec<isize> = perm.iter().map(|&ax| base_strides[ax]).collect();

        let expected = row_major_gather(&elems, &view_sizes, &view_strides);
        let expected_bytes: &[u8] = bytemuck::cast_slice(expected.as_slice());

        for sharing in ALL_MODES {
            let data = SharedBuf::from_vec(bytemuck::cast_slice(elems.as_slice()).to_vec());
            let wire = serialize(
                &view_sizes,
                &view_strides,
                data,
                DataType::I32,
                Endianness::Native,
                sharing,
            );
            let wire_sizes: Vec<u64> = view_sizes.iter().map(|&s| s as u64).collect();
            prop_assert_eq!(&wire.sizes, &wire_sizes);
            prop_assert_eq!(&wire.payload[..], expected_bytes);
        }
    }

    /// Row-pitched 2-D views (the classic "sub-image of a wider image"
    /// layout) gather correctly.
    #[test]
    fn pitched_rows_serialize_to_row_major_gather(
        rows in 1usize..6,
        cols in 1usize..6,
        pad in 0usize..4,
    ) {
        let pitch = cols + pad;
        let elems: Vec<i32> = (0..(rows * pitch) as i32).collect();
        let sizes = [rows, cols];
        let strides = [pitch as isize, 1];

        let expected = row_major_gather(&elems, &sizes, &strides);

        let data = SharedBuf::from_vec(bytemuck::cast_slice(elems.as_slice()).to_vec());
        let wire = serialize(
            &sizes,
            &strides,
            data,
            DataType::I32,
            Endianness::Native,
            SharingMode::All,
        );
        prop_assert_eq!(&wire.payload[..], bytemuck::cast_slice::<i32, u8>(&expected));
    }

    /// Records survive encode → decode byte-for-byte.
    #[test]
    fn record_framing_roundtrips(
        shape in proptest::collection::vec(0usize..5, 0..=3),
    ) {
        let total: usize = if shape.is_empty() { 0 } else { shape.iter().product() };
        let elems: Vec<i32> = (0..total as i32).collect();
        let data = SharedBuf::from_vec(bytemuck::cast_slice(elems.as_slice()).to_vec());
        let wire = serialize(
            &shape,
            &[],
            data,
            DataType::I32,
            Endianness::Native,
            SharingMode::None,
        );

        let encoded = wire.encode();
        let back = WireTensor::decode(&SharedBuf::from_vec(encoded)).unwrap();
        prop_assert_eq!(back, wire);
    }

    /// The record decoder must reject or accept arbitrary bytes without
    /// panicking.
    #[test]
    fn decode_never_panics_on_arbitrary_bytes(
        bytes in proptest::collection::vec(any::<u8>(), 0..160),
    ) {
        let _ = WireTensor::decode(&SharedBuf::from_vec(bytes));
    }
}
