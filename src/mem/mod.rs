mod queue;

pub use self::queue::RecordQueue;

#[derive(Clone, Copy, Debug)]
pub(crate) struct RecordMeta {
    start_offset: usize,
}
