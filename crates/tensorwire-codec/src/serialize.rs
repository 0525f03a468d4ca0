//! Serialization engine: strided view in, canonical wire record out.

use tensorwire_buffer::{BufQueue, SharedBuf};
use tracing::{debug, trace};

use crate::dtype::{DataType, Endianness};
use crate::layout;
use crate::odometer::RunOffsets;
use crate::record::WireTensor;

/// Byte runs below this size are always copied.
///
/// A shared reference costs allocation and refcount traffic; under this
/// threshold a plain copy is cheaper than the bookkeeping.
pub const MIN_SHARE_SIZE: usize = 4 << 10;

/// Policy for aliasing source bytes into the serialized payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharingMode {
    /// Always copy; the output never references the source allocation.
    None,
    /// Alias only segments the engine can verify are exclusively owned.
    ManagedOnly,
    /// Alias any segment large enough to be worth sharing.
    All,
}

/// Serialize a strided view into a canonical row-major wire record.
///
/// `sizes` and `strides` describe the logical view over `data`, whose first
/// byte is element `[0, 0, …]` of the view — callers position a view's base
/// offset by trimming the buffer before the call. Empty `strides` means
/// implicit row-major layout. Strides are in elements and may be negative, as
/// long as every addressed byte stays inside `data`.
///
/// The payload is always the row-major flattening of the logical elements,
/// regardless of the physical stride layout. Depending on `sharing` and run
/// sizes, payload bytes are copied out of `data` or alias its backing
/// allocation; the payload content is identical either way.
///
/// `data` is consumed: on the contiguous fast path its storage moves into the
/// record, on the general path its bytes are read and the handle dropped.
///
/// # Panics
/// Panics on caller-contract violations: a non-native explicit byte order, a
/// stride/shape length mismatch, or strides that address bytes outside
/// `data`.
pub fn serialize(
    sizes: &[usize],
    strides: &[isize],
    mut data: SharedBuf,
    dtype: DataType,
    order: Endianness,
    sharing: SharingMode,
) -> WireTensor {
    let order = order.resolved();
    assert_eq!(
        order,
        Endianness::MACHINE,
        "byte-order conversion is not implemented: requested {order:?} on a {:?} machine",
        Endianness::MACHINE
    );

    let ndims = sizes.len();
    if ndims == 0 {
        // Zero-dimensional tensor: nothing to emit, source is dropped.
        trace!("serializing empty tensor");
        return WireTensor {
            data_type: dtype,
            endianness: order,
            sizes: Vec::new(),
            payload: SharedBuf::new(),
        };
    }

    let run = layout::analyze(sizes, strides);
    let elem = dtype.element_size();
    let wire_sizes: Vec<u64> = sizes.iter().map(|&s| s as u64).collect();

    if run.total_elements == 0 {
        // Zero-size shape: valid, carries its sizes and an empty payload.
        trace!(?sizes, "zero-element tensor, empty payload");
        return WireTensor {
            data_type: dtype,
            endianness: order,
            sizes: wire_sizes,
            payload: SharedBuf::new(),
        };
    }

    assert!(
        run.total_elements <= usize::MAX / elem,
        "tensor of {} {}-byte elements overflows the address space",
        run.total_elements,
        elem
    );
    let total_bytes = run.total_elements * elem;
    let run_bytes = run.run_elements * elem;

    if run.run_start == 0 {
        // The whole view is one flat range: trim and hand it over.
        assert!(
            data.len() >= total_bytes,
            "source buffer holds {} bytes but the view spans {total_bytes}",
            data.len()
        );
        data.trim_end(data.len() - total_bytes);
        let moved = match sharing {
            SharingMode::All => true,
            SharingMode::ManagedOnly => data.is_unique(),
            SharingMode::None => false,
        };
        let payload = if moved { data } else { data.unshared() };
        debug!(total_bytes, moved, "serialized contiguous tensor");
        return WireTensor { data_type: dtype, endianness: order, sizes: wire_sizes, payload };
    }

    // General path: enumerate the leading dimensions and emit one run per
    // index combination. The sharing decision is fixed up front; for
    // ManagedOnly that means ownership is checked before the first alias is
    // created, while the engine's handle is still the only one it knows of.
    let may_share = match sharing {
        SharingMode::None => false,
        SharingMode::ManagedOnly => data.is_unique(),
        SharingMode::All => true,
    };
    let share_runs = may_share && run_bytes >= MIN_SHARE_SIZE;

    let mut queue = BufQueue::new(total_bytes);
    for elem_offset in RunOffsets::new(&sizes[..run.run_start], &strides[..run.run_start]) {
        let byte_offset = elem_offset.checked_mul(elem as isize).and_then(|b| {
            usize::try_from(b).ok()
        });
        let byte_offset = match byte_offset {
            Some(b) => b,
            None => panic!("stride walk stepped before the start of the source buffer"),
        };
        if share_runs {
            queue.append_share(data.share_slice(byte_offset, run_bytes));
        } else {
            queue.append_copy(data.slice(byte_offset, run_bytes));
        }
    }

    let payload = queue.into_buf();
    debug_assert_eq!(payload.len(), total_bytes);
    debug!(
        total_bytes,
        run_bytes,
        leading_dims = run.run_start,
        shared = share_runs,
        "serialized strided tensor"
    );
    WireTensor { data_type: dtype, endianness: order, sizes: wire_sizes, payload }
}

/// Return the payload of a wire record, unchanged.
///
/// The returned buffer shares the record's payload storage; no bytes move.
/// The record's byte order is trusted to be native — the format never stores
/// anything else on this machine, and no conversion is implemented.
///
/// # Panics
/// Panics when the record's type tag differs from `expected`: a mistyped read
/// is data corruption, not a recoverable condition.
pub fn deserialize(tensor: &WireTensor, expected: DataType) -> SharedBuf {
    assert_eq!(
        tensor.data_type, expected,
        "wire tensor holds {} data but {} was requested",
        tensor.data_type, expected
    );
    tensor.payload.clone()
}

/// Serialize a contiguous typed slice with implicit row-major layout.
///
/// Convenience wrapper over [`serialize`] for the common case where the data
/// is already a dense slice in memory.
///
/// # Panics
/// Panics if `T`'s size does not match `dtype`, or if `sizes` addresses more
/// elements than `values` holds.
pub fn serialize_pod<T: bytemuck::Pod>(
    values: &[T],
    sizes: &[usize],
    dtype: DataType,
    sharing: SharingMode,
) -> WireTensor {
    assert_eq!(
        std::mem::size_of::<T>(),
        dtype.element_size(),
        "element type is {} bytes but {} expects {}",
        std::mem::size_of::<T>(),
        dtype,
        dtype.element_size()
    );
    let bytes = bytemuck::cast_slice(values).to_vec();
    serialize(sizes, &[], SharedBuf::from_vec(bytes), dtype, Endianness::Native, sharing)
}

/// Deserialize a record into an owned typed vector.
///
/// Copies the payload (wire payloads carry no alignment guarantee, so typed
/// access must re-materialize).
///
/// # Panics
/// Panics on a type-tag mismatch, like [`deserialize`].
pub fn deserialize_pod<T: bytemuck::Pod>(tensor: &WireTensor, expected: DataType) -> Vec<T> {
    assert_eq!(
        std::mem::size_of::<T>(),
        expected.element_size(),
        "element type is {} bytes but {} expects {}",
        std::mem::size_of::<T>(),
        expected,
        expected.element_size()
    );
    let payload = deserialize(tensor, expected);
    bytemuck::pod_collect_to_vec(payload.as_slice())
}

// ── Tests ───────────────────────────────────────────────────────────
