mod contiguous_runs_iterator;
mod indices_iterator;

pub use contiguous_runs_iterator::ContiguousRunsIterator;
pub use indices_iterator::IndicesIterator;
