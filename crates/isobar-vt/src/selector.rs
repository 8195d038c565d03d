//! Text selection over a screen buffer.
//!
//! The [`Selector`] implements drag selection in four modes:
//!
//! - `Linear`: plain character range between anchor and cursor
//! - `LinearWordWise`: like linear, expanded to word boundaries
//! - `FullLine`: whole logical lines, following soft wraps both ways
//! - `Rectangular`: a column-bounded box
//!
//! It never owns screen data. The caller injects a cell-lookup capability
//! and a wrap predicate; `wrapped(row)` answers whether `row` is a soft
//! continuation of `row - 1`. Coordinates are 1-based in both axes.
//! The resulting selection is read back as an ordered list of [`Range`]s,
//! one per spanned row.

/// Absolute 1-based screen position, ordered by row, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub row: i32,
    pub column: i32,
}

impl Coordinate {
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }
}

/// One selected span on a single row, both columns inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub row: i32,
    pub from_column: i32,
    pub to_column: i32,
}

impl Range {
    #[must_use]
    pub const fn new(row: i32, from_column: i32, to_column: i32) -> Self {
        Self {
            row,
            from_column,
            to_column,
        }
    }

    /// Number of columns covered.
    #[must_use]
    pub const fn length(&self) -> i32 {
        self.to_column - self.from_column + 1
    }
}

/// What the selector needs to know about one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellInfo {
    /// `None` for an empty cell (counts as a word delimiter).
    pub codepoint: Option<char>,
    /// Display width in columns; wide glyphs report 2.
    pub width: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Linear,
    LinearWordWise,
    FullLine,
    Rectangular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    /// Anchor placed, no extension yet.
    Waiting,
    InProgress,
    /// Stopped; the selection is immutable from here on.
    Complete,
}

/// Cell lookup capability; `None` means out of bounds.
pub type GetCellAt<'a> = Box<dyn Fn(Coordinate) -> Option<CellInfo> + 'a>;

/// Soft-wrap predicate: is `row` a continuation of `row - 1`?
pub type WrappedFlag<'a> = Box<dyn Fn(i32) -> bool + 'a>;

/// Drag-selection state machine over an injected screen view.
pub struct Selector<'a> {
    mode: SelectionMode,
    get_cell_at: GetCellAt<'a>,
    wrapped: WrappedFlag<'a>,
    word_delimiters: String,
    total_row_count: i32,
    column_count: i32,
    state: SelectorState,
    start: Coordinate,
    from: Coordinate,
    to: Coordinate,
}

impl std::fmt::Debug for Selector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("start", &self.start)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

impl<'a> Selector<'a> {
    /// Anchor a new selection at `from`.
    ///
    /// FullLine and LinearWordWise auto-extend from the anchor immediately,
    /// so they begin in `InProgress`; Linear and Rectangular wait for the
    /// first [`extend`](Self::extend).
    pub fn new(
        mode: SelectionMode,
        get_cell_at: GetCellAt<'a>,
        wrapped: WrappedFlag<'a>,
        word_delimiters: impl Into<String>,
        total_row_count: i32,
        column_count: i32,
        from: Coordinate,
    ) -> Self {
        let mut selector = Self {
            mode,
            get_cell_at,
            wrapped,
            word_delimiters: word_delimiters.into(),
            total_row_count,
            column_count,
            state: SelectorState::Waiting,
            start: from,
            from,
            to: from,
        };

        match mode {
            SelectionMode::FullLine => {
                selector.extend(Coordinate::new(from.row, 1));
                selector.swap_direction();
                selector.extend(Coordinate::new(from.row, column_count));

                while selector.from.row > 1 && (selector.wrapped)(selector.from.row) {
                    selector.from.row -= 1;
                }
                while selector.to.row < total_row_count && (selector.wrapped)(selector.to.row + 1)
                {
                    selector.to.row += 1;
                }
            }
            SelectionMode::LinearWordWise => {
                selector.state = SelectorState::InProgress;
                selector.extend_selection_backward();
                selector.swap_direction();
                selector.extend_selection_forward();
            }
            SelectionMode::Linear | SelectionMode::Rectangular => {}
        }

        selector
    }

    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> SelectorState {
        self.state
    }

    #[must_use]
    pub fn from(&self) -> Coordinate {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> Coordinate {
        self.to
    }

    /// Extend the selection towards `coord` (the drag cursor).
    ///
    /// # Panics
    ///
    /// Panics when called after [`stop`](Self::stop); a completed selection
    /// is immutable.
    pub fn extend(&mut self, coord: Coordinate) {
        assert!(
            self.state != SelectorState::Complete,
            "extend requires an active selector"
        );

        let coord = Coordinate::new(coord.row, coord.column.clamp(1, self.column_count));
        self.state = SelectorState::InProgress;

        match self.mode {
            SelectionMode::FullLine => {
                if coord > self.start {
                    self.to = coord;
                    while self.to.row < self.total_row_count && (self.wrapped)(self.to.row + 1) {
                        self.to.row += 1;
                    }
                } else if coord < self.start {
                    self.from = coord;
                    while self.from.row > 1 && (self.wrapped)(self.from.row) {
                        self.from.row -= 1;
                    }
                }
            }
            SelectionMode::Linear => {
                self.to = self.stretched_column(coord);
            }
            // The box tracks the raw coordinate; normalization in
            // `ordered()` keeps it well-formed for either drag direction.
            SelectionMode::Rectangular => {
                self.to = coord;
            }
            SelectionMode::LinearWordWise => {
                if coord > self.start {
                    self.to = coord;
                    self.extend_selection_forward();
                } else {
                    self.to = coord;
                    self.extend_selection_backward();
                    self.swap_direction();
                    self.to = self.start;
                    self.extend_selection_forward();
                }
            }
        }
    }

    /// Freeze the selection; only effective while in progress.
    pub fn stop(&mut self) {
        if self.state == SelectorState::InProgress {
            self.state = SelectorState::Complete;
        }
    }

    /// The selected spans, one [`Range`] per spanned row, normalized so the
    /// drag direction does not matter.
    #[must_use]
    pub fn selection(&self) -> Vec<Range> {
        match self.mode {
            SelectionMode::FullLine => self.lines(),
            SelectionMode::Linear | SelectionMode::LinearWordWise => self.linear(),
            SelectionMode::Rectangular => self.rectangular(),
        }
    }

    /// Linear decomposition: one partial range for a single row, first/last
    /// partials with full-width rows in between otherwise.
    #[must_use]
    pub fn linear(&self) -> Vec<Range> {
        let (from, to) = self.ordered();
        let rows = row_span(from, to);
        match rows {
            1 => vec![Range::new(from.row, from.column, to.column)],
            2 => vec![
                Range::new(from.row, from.column, self.column_count),
                Range::new(to.row, 1, to.column),
            ],
            _ => {
                let mut result = Vec::with_capacity(rows);
                result.push(Range::new(from.row, from.column, self.column_count));
                for n in 1..rows - 1 {
                    result.push(Range::new(from.row + n as i32, 1, self.column_count));
                }
                result.push(Range::new(to.row, 1, to.column));
                result
            }
        }
    }

    /// Full-width range per spanned row.
    #[must_use]
    pub fn lines(&self) -> Vec<Range> {
        let (from, to) = self.ordered();
        (0..row_span(from, to))
            .map(|n| Range::new(from.row + n as i32, 1, self.column_count))
            .collect()
    }

    /// Column-bounded box, one range per spanned row.
    #[must_use]
    pub fn rectangular(&self) -> Vec<Range> {
        let (from, to) = self.ordered();
        (0..row_span(from, to))
            .map(|n| Range::new(from.row + n as i32, from.column, to.column))
            .collect()
    }

    // ── internals ──────────────────────────────────────────────────

    fn at(&self, coord: Coordinate) -> Option<CellInfo> {
        (self.get_cell_at)(coord)
    }

    /// Normalized `(min, max)` endpoints regardless of drag direction.
    fn ordered(&self) -> (Coordinate, Coordinate) {
        if self.to < self.from {
            (self.to, self.from)
        } else {
            (self.from, self.to)
        }
    }

    fn swap_direction(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    /// Walk `coord` to the visual end of its glyph: a wide character
    /// stretches to its last column, and a run of empty cells stretches to
    /// the next occupied cell on the row.
    fn stretched_column(&self, coord: Coordinate) -> Coordinate {
        let mut stretched = coord;
        if let Some(cell) = self.at(coord) {
            if cell.width > 1 {
                stretched.column += i32::from(cell.width) - 1;
                return stretched;
            }
        }

        while stretched.column < self.column_count {
            match self.at(stretched) {
                Some(cell) => {
                    if cell.codepoint.is_none() {
                        stretched.column += 1;
                    } else {
                        if cell.width > 1 {
                            stretched.column += i32::from(cell.width) - 1;
                        }
                        break;
                    }
                }
                None => break,
            }
        }

        stretched
    }

    fn is_word_delimiter_at(&self, coord: Coordinate) -> bool {
        match self.at(coord) {
            Some(cell) => match cell.codepoint {
                Some(ch) => self.word_delimiters.contains(ch),
                None => true,
            },
            None => true,
        }
    }

    /// Walk `to` backward until a word delimiter or the buffer start,
    /// following soft wraps into the previous line.
    fn extend_selection_backward(&mut self) {
        let mut last = self.to;
        let mut current = last;
        loop {
            // Note: the wrap check is subsumed by `current.row > 1` below;
            // it is kept to make the wrap-following intent explicit.
            let wrap_into_previous_line =
                current.column == 1 && current.row > 1 && (self.wrapped)(current.row);
            if current.column > 1 {
                current.column -= 1;
            } else if current.row > 1 || wrap_into_previous_line {
                current.row -= 1;
                current.column = self.column_count;
            } else {
                break;
            }

            if self.is_word_delimiter_at(current) {
                break;
            }
            last = current;
        }

        if self.to < self.from {
            self.swap_direction();
        }
        self.to = last;
    }

    /// Walk `to` forward until a word delimiter or the buffer end,
    /// following soft wraps into the next line.
    fn extend_selection_forward(&mut self) {
        let mut last = self.to;
        let mut current = last;
        loop {
            if current.column == self.column_count
                && current.row < self.total_row_count
                && (self.wrapped)(current.row + 1)
            {
                current.row += 1;
                current.column = 1;
                current =
                    self.stretched_column(Coordinate::new(current.row, current.column + 1));
            }

            if current.column < self.column_count {
                current = self.stretched_column(Coordinate::new(current.row, current.column + 1));
            } else if current.row < self.total_row_count {
                current.row += 1;
                current.column = 1;
            } else {
                break;
            }

            if self.is_word_delimiter_at(current) {
                break;
            }
            last = current;
        }

        self.to = self.stretched_column(last);
    }
}

fn row_span(from: Coordinate, to: Coordinate) -> usize {
    (to.row - from.row + 1).max(1) as usize
}
