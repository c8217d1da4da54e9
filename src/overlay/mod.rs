//! Overlay tracking: keep one externally owned control glued to a cell.
//!
//! The tracker listens to the grid's structural events through its own
//! mailbox. The host calls [`OverlayTracker::process_events`] after mutating
//! the grid; every geometry change re-runs [`OverlayTracker::layout`], which
//! preserves keyboard focus across the move.
//!
//! Tree expand/collapse is special: the control is hidden at once and the
//! relayout is posted to the [`Scheduler`], since the new row geometry is
//! only final once the structural change completes. The deferred task holds
//! weak references and does nothing if the tracker, the control or the grid
//! went away in between.

mod control;
mod policy;

pub use control::OverlayControl;
pub use policy::{HorizontalAlignment, OverlayPolicy, VerticalAlignment};

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{GridError, Result};
use crate::events::{ListenerId, StructuralEvent, Topic};
use crate::grid::Grid;
use crate::layout::GroupId;
use crate::scheduler::Scheduler;
use crate::tree::ItemId;
use crate::types::{Disposable, Rect};

/// Shared control handle
pub type ControlRef = Rc<RefCell<dyn OverlayControl>>;

struct TrackerState {
    listener: Option<ListenerId>,
    control: Option<ControlRef>,
    item: Option<ItemId>,
    column: Option<usize>,
    /// Column (and its group) the listener is subscribed to
    subscribed: Option<(usize, Option<GroupId>)>,
    policy: OverlayPolicy,
    detached: bool,
}

/// Keeps an [`OverlayControl`] positioned over one cell of a [`Grid`].
pub struct OverlayTracker {
    state: Rc<RefCell<TrackerState>>,
    grid: Weak<RefCell<Grid>>,
    scheduler: Rc<Scheduler>,
}

impl fmt::Debug for OverlayTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("OverlayTracker");
        if let Ok(state) = self.state.try_borrow() {
            out.field("item", &state.item)
                .field("column", &state.column)
                .field("policy", &state.policy)
                .field("has_control", &state.control.is_some())
                .field("detached", &state.detached);
        }
        out.finish_non_exhaustive()
    }
}

impl OverlayTracker {
    /// Attach a tracker to `grid`, listening for resize, scroll and tree
    /// changes. Column subscriptions follow [`OverlayTracker::set_column`].
    ///
    /// # Errors
    /// `DisposedAccess` for a disposed grid, `InvalidState` while the grid
    /// is borrowed elsewhere.
    pub fn new(grid: &Rc<RefCell<Grid>>, scheduler: Rc<Scheduler>) -> Result<Self> {
        let listener = {
            let mut g = grid.try_borrow_mut().map_err(|_| busy())?;
            if g.is_disposed() {
                return Err(GridError::DisposedAccess);
            }
            let id = g.register_listener();
            for topic in [Topic::Resize, Topic::Scroll, Topic::Tree] {
                g.subscribe(id, topic);
            }
            id
        };
        log::debug!("overlay tracker attached as {listener:?}");
        Ok(Self {
            state: Rc::new(RefCell::new(TrackerState {
                listener: Some(listener),
                control: None,
                item: None,
                column: None,
                subscribed: None,
                policy: OverlayPolicy::default(),
                detached: false,
            })),
            grid: Rc::downgrade(grid),
            scheduler,
        })
    }

    pub fn item(&self) -> Option<ItemId> {
        self.state.borrow().item
    }

    pub fn column(&self) -> Option<usize> {
        self.state.borrow().column
    }

    pub fn control(&self) -> Option<ControlRef> {
        self.state.borrow().control.as_ref().map(Rc::clone)
    }

    pub fn policy(&self) -> OverlayPolicy {
        self.state.borrow().policy
    }

    pub fn listener(&self) -> Option<ListenerId> {
        self.state.borrow().listener
    }

    pub fn set_policy(&mut self, policy: OverlayPolicy) {
        self.state.borrow_mut().policy = policy;
        self.layout();
    }

    pub fn set_item(&mut self, item: Option<ItemId>) {
        self.state.borrow_mut().item = item;
        self.layout();
    }

    /// Target a column and move the column subscriptions to it.
    ///
    /// A grid without columns has one implicit column: 0 is accepted and
    /// anything else clears the target column.
    ///
    /// # Errors
    /// `DisposedAccess` when the grid is gone; `InvalidState` while the grid
    /// is borrowed elsewhere; `InvalidRange` for a column outside the grid
    /// (the previous column is released either way).
    pub fn set_column(&mut self, column: Option<usize>) -> Result<()> {
        let grid = self
            .grid
            .upgrade()
            .ok_or(GridError::DisposedAccess)?;
        {
            let mut grid = grid.try_borrow_mut().map_err(|_| {
                log::warn!("grid busy, overlay column left unchanged");
                busy()
            })?;
            if grid.is_disposed() {
                return Err(GridError::DisposedAccess);
            }
            let mut state = self.state.borrow_mut();
            let count = grid.columns().len();
            if count == 0 {
                state.column = column.filter(|c| *c == 0);
            } else {
                release_column(&mut state, &mut grid);
                state.column = None;
                let Some(column) = column else {
                    return Ok(());
                };
                GridError::check_range(column, count)?;
                let group = grid.columns().group_of(column);
                if let Some(listener) = state.listener {
                    grid.subscribe(listener, Topic::Column(column));
                    if let Some(group) = group {
                        grid.subscribe(listener, Topic::ColumnGroup(group));
                    }
                }
                state.subscribed = Some((column, group));
                state.column = Some(column);
            }
        }
        self.layout();
        Ok(())
    }

    pub fn set_control(&mut self, control: Option<ControlRef>) {
        self.state.borrow_mut().control = control;
        self.layout();
    }

    /// Set control, item and column in one go.
    pub fn set_editor(&mut self, control: ControlRef, item: ItemId, column: usize) -> Result<()> {
        self.set_item(Some(item));
        self.set_column(Some(column))?;
        self.set_control(Some(control));
        Ok(())
    }

    /// Rectangle the control should occupy right now.
    ///
    /// [`Rect::EMPTY`] without a usable target; [`Rect::OFF_SCREEN`]-based
    /// when the cell is not displayed.
    pub fn compute_bounds(&self) -> Rect {
        let Some(grid) = self.grid.upgrade() else {
            return Rect::EMPTY;
        };
        let (Ok(grid), Ok(state)) = (grid.try_borrow(), self.state.try_borrow()) else {
            return Rect::EMPTY;
        };
        compute_bounds_in(&state, &grid)
    }

    /// Move the control onto its cell, restoring focus if it had it.
    pub fn layout(&self) {
        layout(&self.state, &self.grid);
    }

    /// Handle the structural events queued for this tracker. Returns how many
    /// were handled.
    pub fn process_events(&mut self) -> usize {
        let listener = self.state.borrow().listener;
        let Some(listener) = listener else {
            return 0;
        };
        let Some(grid) = self.grid.upgrade() else {
            return 0;
        };
        let events = match grid.try_borrow_mut() {
            Ok(mut grid) => grid.drain_events(listener),
            Err(_) => {
                log::warn!("grid busy, overlay events left queued");
                return 0;
            }
        };
        for event in &events {
            self.handle_event(*event);
        }
        events.len()
    }

    fn handle_event(&self, event: StructuralEvent) {
        log::trace!("overlay handling {event:?}");
        match event {
            StructuralEvent::ColumnMoved(_)
            | StructuralEvent::ColumnResized(_)
            | StructuralEvent::Resized
            | StructuralEvent::Scrolled(_) => self.layout(),
            StructuralEvent::ColumnShown(_)
            | StructuralEvent::ColumnHidden(_)
            | StructuralEvent::GroupExpanded(_)
            | StructuralEvent::GroupCollapsed(_) => self.follow_column_visibility(),
            StructuralEvent::TreeExpanded(_) | StructuralEvent::TreeCollapsed(_) => {
                self.hide_and_defer();
            }
        }
    }

    fn live_control(&self) -> Option<ControlRef> {
        let control = self.control()?;
        let disposed = control.borrow().is_disposed();
        (!disposed).then_some(control)
    }

    fn follow_column_visibility(&self) {
        let Some(control) = self.live_control() else {
            return;
        };
        let Some(column) = self.column() else {
            return;
        };
        let Some(grid) = self.grid.upgrade() else {
            return;
        };
        let visible = match grid.try_borrow() {
            Ok(grid) => grid.columns().is_visible(column),
            Err(_) => return,
        };
        control.borrow_mut().set_visible(visible);
        if visible {
            self.layout();
        }
    }

    fn hide_and_defer(&self) {
        let Some(control) = self.live_control() else {
            return;
        };
        control.borrow_mut().set_visible(false);
        let state = Rc::downgrade(&self.state);
        let grid = Weak::clone(&self.grid);
        self.scheduler.post(move || deferred_relayout(&state, &grid));
    }

    /// Drop every subscription and the target. Safe after the grid is gone.
    pub fn detach(&mut self) {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            log::warn!("overlay state busy, detach skipped");
            return;
        };
        if state.detached {
            return;
        }
        if let (Some(listener), Some(grid)) = (state.listener, self.grid.upgrade()) {
            match grid.try_borrow_mut() {
                Ok(mut grid) => grid.unregister_listener(listener),
                Err(_) => log::warn!("grid busy, {listener:?} left registered"),
            }
        }
        state.listener = None;
        state.subscribed = None;
        state.item = None;
        state.column = None;
        state.control = None;
        state.detached = true;
        log::debug!("overlay tracker detached");
    }
}

impl Disposable for OverlayTracker {
    fn is_disposed(&self) -> bool {
        self.state.try_borrow().is_ok_and(|s| s.detached)
    }
}

impl Drop for OverlayTracker {
    fn drop(&mut self) {
        self.detach();
    }
}

fn busy() -> GridError {
    GridError::InvalidState("grid is borrowed".to_string())
}

fn release_column(state: &mut TrackerState, grid: &mut Grid) {
    let Some((column, group)) = state.subscribed.take() else {
        return;
    };
    if let Some(listener) = state.listener {
        grid.unsubscribe(listener, Topic::Column(column));
        if let Some(group) = group {
            grid.unsubscribe(listener, Topic::ColumnGroup(group));
        }
    }
}

fn target_is_valid(state: &TrackerState, grid: &Grid) -> bool {
    let Some(item) = state.item else {
        return false;
    };
    if !grid.contains(item) {
        return false;
    }
    let count = grid.columns().len();
    match state.column {
        Some(column) if count == 0 => column == 0,
        Some(column) => column < count,
        None => false,
    }
}

fn compute_bounds_in(state: &TrackerState, grid: &Grid) -> Rect {
    let (Some(item), Some(column)) = (state.item, state.column) else {
        return Rect::EMPTY;
    };
    if !target_is_valid(state, grid) {
        return Rect::EMPTY;
    }
    let Ok(mut cell) = grid.cell_bounds_corrected(item, column) else {
        return Rect::EMPTY;
    };

    let area = grid.viewport().client_area;
    if cell.x < area.right() && cell.right() > area.right() {
        cell.width = area.right() - cell.x;
    }

    let policy = &state.policy;
    let mut rect = Rect::new(cell.x, cell.y, policy.minimum_width, policy.minimum_height);
    if policy.grab_horizontal {
        let lines = if grid.viewport().lines_visible { 2 } else { 0 };
        rect.width = cell.width.max(policy.minimum_width) - lines;
    }
    if policy.grab_vertical {
        rect.height = cell.height.max(policy.minimum_height);
    }

    match policy.horizontal {
        HorizontalAlignment::Left => {}
        HorizontalAlignment::Center => rect.x += (cell.width - rect.width) / 2,
        HorizontalAlignment::Right => rect.x += cell.width - rect.width,
    }
    match policy.vertical {
        VerticalAlignment::Top => {}
        VerticalAlignment::Center => rect.y += (cell.height - rect.height) / 2,
        VerticalAlignment::Bottom => rect.y += cell.height - rect.height,
    }

    if grid.columns().is_tree(column) {
        if let Ok(text) = grid.text_bounds(item, column, false) {
            rect.x += text.x;
            rect.width -= text.x;
        }
    }
    rect
}

fn layout(state: &RefCell<TrackerState>, grid: &Weak<RefCell<Grid>>) {
    let Some(grid) = grid.upgrade() else {
        return;
    };
    // Compute under the borrows, then release them before touching the control.
    let (control, bounds) = {
        let (Ok(grid), Ok(state)) = (grid.try_borrow(), state.try_borrow()) else {
            log::warn!("overlay layout skipped: state busy");
            return;
        };
        if state.detached || grid.is_disposed() || !target_is_valid(&state, &grid) {
            return;
        }
        let Some(control) = state.control.as_ref().map(Rc::clone) else {
            return;
        };
        (control, compute_bounds_in(&state, &grid))
    };

    let had_focus = {
        let control = control.borrow();
        if control.is_disposed() {
            return;
        }
        control.is_visible() && control.has_focus()
    };
    log::trace!("overlay bounds {bounds:?} (had focus: {had_focus})");
    control.borrow_mut().set_bounds(bounds);
    if had_focus {
        let mut control = control.borrow_mut();
        if !control.is_disposed() {
            control.set_focus();
        }
    }
}

fn deferred_relayout(state: &Weak<RefCell<TrackerState>>, grid: &Weak<RefCell<Grid>>) {
    let Some(state) = state.upgrade() else {
        log::warn!("overlay tracker dropped before deferred relayout");
        return;
    };
    let control = match state.try_borrow() {
        Ok(s) if !s.detached => s.control.as_ref().map(Rc::clone),
        _ => None,
    };
    let Some(control) = control else {
        return;
    };
    if control.borrow().is_disposed() {
        return;
    }
    let grid_alive = grid
        .upgrade()
        .is_some_and(|g| g.try_borrow().is_ok_and(|g| !g.is_disposed()));
    if !grid_alive {
        log::warn!("grid disposed before deferred relayout");
        return;
    }
    layout(&state, grid);
    control.borrow_mut().set_visible(true);
}
