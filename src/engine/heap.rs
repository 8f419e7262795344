/// Array-backed binary min-heap.
///
/// Ordering comes entirely from `T: Ord`; callers that need a stable
/// tie-break fold it into the key (see `huffman::HeapEntry`).
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

impl<T: Ord> MinHeap<T> {
    /// Heapifies `source` bottom-up in O(n).
    pub fn build(source: Vec<T>) -> Self {
        let mut heap = MinHeap { elements: source };
        let n = heap.len();
        if n > 1 {
            for i in (0..n / 2).rev() {
                heap.sift_down(i);
            }
        }
        heap
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        self.sift_up(self.len() - 1);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.len() - 1;
        self.elements.swap(0, last);
        let min = self.elements.pop();
        if !self.elements.is_empty() {
            self.sift_down(0);
        }
        min
    }

    /// Removes and returns the smallest element.
    ///
    /// # Panics
    ///
    /// Panics with "heap underflow" on an empty heap. Callers check the
    /// length first, so reaching this is a logic error.
    pub fn extract_min(&mut self) -> T {
        match self.pop() {
            Some(min) => min,
            None => panic!("heap underflow"),
        }
    }

    pub fn is_valid(&self) -> bool {
        (1..self.len()).all(|i| self.elements[Self::parent(i)] <= self.elements[i])
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[i] < self.elements[p] {
                self.elements.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.len();
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < n && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < n && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                break;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }
}
