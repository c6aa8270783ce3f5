//! Batch chunking

/// A contiguous run of batch items
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// Index of the first item in the original batch
    pub start: usize,
    /// The items
    pub items: &'a [&'a str],
}

impl Chunk<'_> {
    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the chunk has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index one past the last item
    pub fn end(&self) -> usize {
        self.start + self.items.len()
    }
}

/// Splits batches into fixed-size chunks
#[derive(Debug, Clone, Copy)]
pub struct ChunkManager {
    chunk_size: usize,
}

impl ChunkManager {
    /// Create a chunk manager; a size of zero is treated as one
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Items per chunk
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks a batch of `len` items produces
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    /// Split `items` into chunks covering every item exactly once, in order
    pub fn partition<'a>(&self, items: &'a [&'a str]) -> Vec<Chunk<'a>> {
        items
            .chunks(self.chunk_size)
            .enumerate()
            .map(|(i, items)| Chunk {
                start: i * self.chunk_size,
                items,
            })
            .collect()
    }
}
