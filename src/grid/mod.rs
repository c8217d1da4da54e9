//! The grid host model.
//!
//! [`Grid`] ties the row tree, the column set and the viewport together with
//! the host capabilities (data provider, renderers). It is the only place
//! that mutates them, so it can keep the derived state in step:
//! - displayed range and scroll bounds marked obsolete on structural change
//! - selection pruned and focus moved on collapse
//! - virtual rows materialized on first read
//! - structural events published to subscribed listeners

mod selection;

pub use selection::SelectionModel;

use std::collections::HashMap;
use std::fmt;

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::events::{
    ListenerId, ListenerRegistry, Notification, ScrollAxis, StructuralEvent, Topic,
};
use crate::layout::{Column, ColumnSet, GroupId, RowExtent, SpanResolver, Viewport};
use crate::provider::{
    CellContext, CellDataProvider, CellRenderer, DefaultCellRenderer, MapDataProvider,
};
use crate::tree::{ItemId, ItemTree};
use crate::types::{
    Color, Disposable, FontId, ImageId, Rect, SelectionDetail, SelectionMode, Size,
};
use crate::virtual_data::{Materializer, VirtualDataBridge};

/// Smallest height `pack` will assign
const MIN_PACKED_HEIGHT: i32 = 2;

/// Hierarchical grid state.
pub struct Grid {
    tree: ItemTree,
    columns: ColumnSet,
    viewport: Viewport,
    selection: SelectionModel,
    /// Focused row and, in cell mode, column
    focus: Option<(ItemId, Option<usize>)>,
    data: Box<dyn CellDataProvider>,
    renderers: HashMap<usize, Box<dyn CellRenderer>>,
    default_renderer: DefaultCellRenderer,
    virtual_data: VirtualDataBridge,
    listeners: ListenerRegistry,
    notifications: Vec<Notification>,
    background: Color,
    foreground: Color,
    font: FontId,
    has_spanning: bool,
    has_differing_heights: bool,
    scroll_bounds_obsolete: bool,
    disposed: bool,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.tree.len())
            .field("visible_rows", &self.tree.visible_count())
            .field("columns", &self.columns.len())
            .field("viewport", &self.viewport)
            .field("virtual_data", &self.virtual_data)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(&GridConfig::default())
    }
}

impl Grid {
    /// Create a grid backed by an in-memory [`MapDataProvider`].
    pub fn new(config: &GridConfig) -> Self {
        Self::with_provider(config, Box::new(MapDataProvider::new()))
    }

    /// Create a grid backed by a host-supplied data provider.
    pub fn with_provider(config: &GridConfig, data: Box<dyn CellDataProvider>) -> Self {
        let mut viewport = Viewport::new();
        viewport.lines_visible = config.lines_visible;
        viewport.row_header_visible = config.row_header_visible;
        viewport.row_header_width = config.row_header_width;
        viewport.column_header_visible = config.column_header_visible;
        viewport.header_height = config.header_height;

        let default_renderer = DefaultCellRenderer {
            indent: config.tree_indent,
            ..DefaultCellRenderer::default()
        };

        Self {
            tree: ItemTree::new(config.default_row_height),
            columns: ColumnSet::new(),
            viewport,
            selection: SelectionModel::new(config.selection_mode),
            focus: None,
            data,
            renderers: HashMap::new(),
            default_renderer,
            virtual_data: VirtualDataBridge::new(config.virtual_mode),
            listeners: ListenerRegistry::new(),
            notifications: Vec::new(),
            background: Color::WHITE,
            foreground: Color::BLACK,
            font: FontId(0),
            has_spanning: false,
            has_differing_heights: false,
            scroll_bounds_obsolete: false,
            disposed: false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The row hierarchy (read-only; mutate through the grid)
    pub fn tree(&self) -> &ItemTree {
        &self.tree
    }

    /// Column widths, order, visibility and groups
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Client area, scroll position and displayed range
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current row or cell selection
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// The cell data provider
    pub fn data(&self) -> &dyn CellDataProvider {
        self.data.as_ref()
    }

    /// Whether `item` is a live row of this grid
    pub fn contains(&self, item: ItemId) -> bool {
        self.tree.contains(item)
    }

    /// Total number of rows, visible or not
    pub fn item_count(&self) -> usize {
        self.tree.len()
    }

    /// Whether any cell has had a column or row span set
    pub fn has_spanning(&self) -> bool {
        self.has_spanning
    }

    /// Whether any row height was set explicitly
    pub fn has_differing_heights(&self) -> bool {
        self.has_differing_heights
    }

    /// Whether the host must recompute scrollbar bounds.
    pub fn scroll_bounds_obsolete(&self) -> bool {
        self.scroll_bounds_obsolete
    }

    /// The host has recomputed scrollbar bounds.
    pub fn acknowledge_scroll_bounds(&mut self) {
        self.scroll_bounds_obsolete = false;
    }

    /// Take the notifications queued since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.disposed {
            Err(GridError::DisposedAccess)
        } else {
            Ok(())
        }
    }

    /// Valid columns are `[0, len)`, or just 0 when there are no columns.
    fn check_column(&self, column: usize) -> Result<()> {
        GridError::check_range(column, self.columns.len().max(1))
    }

    fn check_cell(&self, item: ItemId, column: usize) -> Result<()> {
        self.ensure_alive()?;
        self.tree.node(item)?;
        self.check_column(column)
    }

    fn mark_scroll_obsolete(&mut self) {
        if !self.scroll_bounds_obsolete {
            self.scroll_bounds_obsolete = true;
            self.notifications.push(Notification::ScrollBoundsObsolete);
        }
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Insert a row under `parent` (or at root level) at `index`, appending
    /// when `index` is `None`.
    pub fn insert_item(&mut self, parent: Option<ItemId>, index: Option<usize>) -> Result<ItemId> {
        self.ensure_alive()?;
        let id = self.tree.insert(parent, index)?;
        self.viewport.invalidate_range();
        self.mark_scroll_obsolete();
        Ok(id)
    }

    /// Dispose a row and its whole subtree, youngest children first.
    ///
    /// Clears provider data and selection for every removed row. Focus on a
    /// removed row is dropped.
    pub fn dispose_item(&mut self, item: ItemId) -> Result<()> {
        self.ensure_alive()?;
        let removed = self.tree.remove(item)?;
        for id in &removed {
            self.data.clear_row(*id);
            self.selection.purge(*id);
        }
        if self
            .focus
            .is_some_and(|(focus, _)| removed.contains(&focus))
        {
            self.focus = None;
        }
        log::debug!("disposed {item} ({} rows)", removed.len());
        self.viewport.invalidate_range();
        self.mark_scroll_obsolete();
        Ok(())
    }

    /// Expand or collapse a row.
    ///
    /// Collapsing deselects every descendant (whole rows or all their cells,
    /// per selection mode) and reports it with a single notification. Focus
    /// on a row that became invisible moves to `item`. A tree event is
    /// published when the flag actually changed.
    pub fn set_expanded(&mut self, item: ItemId, expanded: bool) -> Result<()> {
        self.ensure_alive()?;
        let changed = self.tree.set_expanded(item, expanded)?;

        if !expanded {
            let hidden = self.tree.descendants(item);
            if self.selection.deselect_all_of(&hidden) {
                self.notifications.push(Notification::Selection {
                    item,
                    detail: SelectionDetail::Changed,
                });
            }
        }

        self.viewport.invalidate_range();
        self.mark_scroll_obsolete();

        if let Some((focus, column)) = self.focus {
            if !self.tree.is_visible(focus).unwrap_or(false) {
                log::debug!("focus moved from hidden {focus} to {item}");
                self.focus = Some((item, column));
            }
        }

        if changed {
            log::debug!(
                "{} {item}",
                if expanded { "expanded" } else { "collapsed" }
            );
            self.listeners.publish(if expanded {
                StructuralEvent::TreeExpanded(item)
            } else {
                StructuralEvent::TreeCollapsed(item)
            });
        }
        Ok(())
    }

    /// Show or hide a root row, e.g. for host-side filtering.
    ///
    /// Child visibility always follows the parent, so non-root rows are
    /// rejected with `InvalidState`.
    pub fn set_item_visible(&mut self, item: ItemId, visible: bool) -> Result<()> {
        self.ensure_alive()?;
        if self.tree.parent(item)?.is_some() {
            return Err(GridError::InvalidState(format!(
                "{item} is not a root; its visibility follows its parent"
            )));
        }
        self.tree.set_visible(item, visible)?;
        self.viewport.invalidate_range();
        self.mark_scroll_obsolete();
        Ok(())
    }

    /// Row height in pixels
    pub fn height(&self, item: ItemId) -> Result<i32> {
        self.tree.height(item)
    }

    /// # Errors
    /// `InvalidArgument` when `height < 1`.
    pub fn set_height(&mut self, item: ItemId, height: i32) -> Result<()> {
        self.ensure_alive()?;
        self.tree.set_height(item, height)?;
        self.has_differing_heights = true;
        if self.tree.is_visible(item)? {
            let row = self.tree.row_index(item)?;
            let inside = self
                .viewport
                .displayed_range(&self.tree)
                .is_some_and(|r| r.top <= row && row <= r.bottom);
            if inside {
                self.viewport.invalidate_range();
            }
        }
        self.mark_scroll_obsolete();
        Ok(())
    }

    /// Size the row to the tallest preferred height among the visible
    /// columns' renderers (at least 2 pixels).
    ///
    /// Renderers measure content, so a virtual row is materialized first.
    pub fn pack(&mut self, item: ItemId) -> Result<()> {
        self.ensure_alive()?;
        self.materialize(item)?;
        let mut height = MIN_PACKED_HEIGHT;
        let columns: Vec<usize> = self.columns.visible_in_order().collect();
        for column in columns {
            let cell = self.cell_context(item, column)?;
            let width = self.columns.get(column)?.width;
            let size = self.renderer(column).compute_size(&cell, Some(width), None);
            height = height.max(size.height);
        }
        self.set_height(item, height)
    }

    /// Reset a row's defaults, header, provider data and materialization, and
    /// that of all descendants when `all_children` is set.
    pub fn clear(&mut self, item: ItemId, all_children: bool) -> Result<()> {
        self.ensure_alive()?;
        let mut rows = vec![item];
        if all_children {
            rows.extend(self.tree.descendants(item));
        }
        for row in &rows {
            *self.tree.defaults_mut(*row)? = Default::default();
            *self.tree.header_mut(*row)? = Default::default();
            self.data.clear_row(*row);
        }
        self.virtual_data.reset(&mut self.tree, item, all_children)?;
        log::debug!("cleared {item} (all_children: {all_children})");
        Ok(())
    }

    /// Whether the row is visible and fully inside the displayed range.
    pub fn is_shown(&self, item: ItemId) -> bool {
        self.viewport.is_shown(&self.tree, item)
    }

    // -------------------------------------------------------------------------
    // Selection and focus
    // -------------------------------------------------------------------------

    /// Switch between row and cell selection, clearing the selection on change.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection.set_mode(mode);
    }

    /// Select a whole row. Returns whether it was newly selected.
    pub fn select(&mut self, item: ItemId) -> Result<bool> {
        self.ensure_alive()?;
        self.tree.node(item)?;
        Ok(self.selection.select(item))
    }

    /// Deselect a whole row. Returns whether it was selected.
    pub fn deselect(&mut self, item: ItemId) -> Result<bool> {
        self.ensure_alive()?;
        self.tree.node(item)?;
        Ok(self.selection.deselect(item))
    }

    /// Select one cell. Returns whether it was newly selected.
    pub fn select_cell(&mut self, item: ItemId, column: usize) -> Result<bool> {
        self.check_cell(item, column)?;
        Ok(self.selection.select_cell(item, column))
    }

    pub fn is_selected(&self, item: ItemId) -> bool {
        self.selection.is_selected(item)
    }

    pub fn is_cell_selected(&self, item: ItemId, column: usize) -> bool {
        self.selection.is_cell_selected(item, column)
    }

    /// Row holding logical focus
    pub fn focus(&self) -> Option<ItemId> {
        self.focus.map(|(item, _)| item)
    }

    /// Focused column in cell mode
    pub fn focus_column(&self) -> Option<usize> {
        self.focus.and_then(|(_, column)| column)
    }

    /// Move logical focus; `None` clears it.
    pub fn set_focus(&mut self, item: Option<ItemId>, column: Option<usize>) -> Result<()> {
        self.ensure_alive()?;
        self.focus = match item {
            Some(item) => {
                self.tree.node(item)?;
                if let Some(column) = column {
                    self.check_column(column)?;
                }
                Some((item, column))
            }
            None => None,
        };
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Cell content
    // -------------------------------------------------------------------------

    /// Turn lazy row population on or off
    pub fn set_virtual_mode(&mut self, enabled: bool) {
        self.virtual_data.set_enabled(enabled);
    }

    /// Whether rows are populated lazily
    pub fn is_virtual(&self) -> bool {
        self.virtual_data.is_enabled()
    }

    /// Install the callback that fills virtual rows.
    pub fn set_materializer(&mut self, materializer: Option<Box<dyn Materializer>>) {
        self.virtual_data.set_materializer(materializer);
    }

    /// Number of data requests issued for virtual rows
    pub fn materialization_count(&self) -> usize {
        self.virtual_data.request_count()
    }

    fn materialize(&mut self, item: ItemId) -> Result<()> {
        self.virtual_data.ensure_materialized(
            &mut self.tree,
            item,
            self.data.as_mut(),
            &mut self.notifications,
        )?;
        Ok(())
    }

    /// Cell text. Reading materializes a virtual row.
    pub fn text(&mut self, item: ItemId, column: usize) -> Result<Option<&str>> {
        self.check_cell(item, column)?;
        self.materialize(item)?;
        Ok(self.data.text(item, column))
    }

    /// Set cell text. Writes never materialize.
    pub fn set_text(&mut self, item: ItemId, column: usize, text: impl Into<String>) -> Result<()> {
        self.check_cell(item, column)?;
        self.data.set_text(item, column, text.into());
        Ok(())
    }

    /// Cell image. Reading materializes a virtual row.
    pub fn image(&mut self, item: ItemId, column: usize) -> Result<Option<ImageId>> {
        self.check_cell(item, column)?;
        self.materialize(item)?;
        Ok(self.data.image(item, column))
    }

    pub fn set_image(&mut self, item: ItemId, column: usize, image: Option<ImageId>) -> Result<()> {
        self.check_cell(item, column)?;
        self.data.set_image(item, column, image);
        Ok(())
    }

    /// Checkbox state. Reading materializes a virtual row.
    pub fn checked(&mut self, item: ItemId, column: usize) -> Result<bool> {
        self.check_cell(item, column)?;
        self.materialize(item)?;
        Ok(self.data.checked(item, column))
    }

    pub fn set_checked(&mut self, item: ItemId, column: usize, checked: bool) -> Result<()> {
        self.check_cell(item, column)?;
        self.data.set_checked(item, column, checked);
        Ok(())
    }

    /// Grayed checkbox state. Reading materializes a virtual row.
    pub fn grayed(&mut self, item: ItemId, column: usize) -> Result<bool> {
        self.check_cell(item, column)?;
        self.materialize(item)?;
        Ok(self.data.grayed(item, column))
    }

    pub fn set_grayed(&mut self, item: ItemId, column: usize, grayed: bool) -> Result<()> {
        self.check_cell(item, column)?;
        self.data.set_grayed(item, column, grayed);
        Ok(())
    }

    /// Cell background set on the provider, without row fallback.
    pub fn background(&mut self, item: ItemId, column: usize) -> Result<Option<Color>> {
        self.check_cell(item, column)?;
        self.materialize(item)?;
        Ok(self.data.background(item, column))
    }

    pub fn set_background(
        &mut self,
        item: ItemId,
        column: usize,
        color: Option<Color>,
    ) -> Result<()> {
        self.check_cell(item, column)?;
        self.data.set_background(item, column, color);
        Ok(())
    }

    /// Cell foreground set on the provider, without row fallback.
    pub fn foreground(&mut self, item: ItemId, column: usize) -> Result<Option<Color>> {
        self.check_cell(item, column)?;
        self.materialize(item)?;
        Ok(self.data.foreground(item, column))
    }

    pub fn set_foreground(
        &mut self,
        item: ItemId,
        column: usize,
        color: Option<Color>,
    ) -> Result<()> {
        self.check_cell(item, column)?;
        self.data.set_foreground(item, column, color);
        Ok(())
    }

    /// Cell font set on the provider, without row fallback.
    pub fn font(&mut self, item: ItemId, column: usize) -> Result<Option<FontId>> {
        self.check_cell(item, column)?;
        self.materialize(item)?;
        Ok(self.data.font(item, column))
    }

    pub fn set_font(&mut self, item: ItemId, column: usize, font: Option<FontId>) -> Result<()> {
        self.check_cell(item, column)?;
        self.data.set_font(item, column, font);
        Ok(())
    }

    /// Cell tooltip. Reading materializes a virtual row.
    pub fn tooltip_text(&mut self, item: ItemId, column: usize) -> Result<Option<&str>> {
        self.check_cell(item, column)?;
        self.materialize(item)?;
        Ok(self.data.tooltip_text(item, column))
    }

    pub fn set_tooltip_text(
        &mut self,
        item: ItemId,
        column: usize,
        tooltip: Option<String>,
    ) -> Result<()> {
        self.check_cell(item, column)?;
        self.data.set_tooltip_text(item, column, tooltip);
        Ok(())
    }

    // Row defaults fall back to the grid-wide values.

    /// Row background, or the grid default
    pub fn row_background(&self, item: ItemId) -> Result<Color> {
        Ok(self.tree.defaults(item)?.background.unwrap_or(self.background))
    }

    pub fn set_row_background(&mut self, item: ItemId, color: Option<Color>) -> Result<()> {
        self.ensure_alive()?;
        self.tree.defaults_mut(item)?.background = color;
        Ok(())
    }

    /// Row foreground, or the grid default
    pub fn row_foreground(&self, item: ItemId) -> Result<Color> {
        Ok(self.tree.defaults(item)?.foreground.unwrap_or(self.foreground))
    }

    pub fn set_row_foreground(&mut self, item: ItemId, color: Option<Color>) -> Result<()> {
        self.ensure_alive()?;
        self.tree.defaults_mut(item)?.foreground = color;
        Ok(())
    }

    /// Row font, or the grid default
    pub fn row_font(&self, item: ItemId) -> Result<FontId> {
        Ok(self.tree.defaults(item)?.font.unwrap_or(self.font))
    }

    pub fn set_row_font(&mut self, item: ItemId, font: Option<FontId>) -> Result<()> {
        self.ensure_alive()?;
        self.tree.defaults_mut(item)?.font = font;
        Ok(())
    }

    /// Grid-wide colors used by rows without their own
    pub fn set_default_colors(&mut self, background: Color, foreground: Color) {
        self.background = background;
        self.foreground = foreground;
    }

    /// Grid-wide font used by rows without their own
    pub fn set_default_font(&mut self, font: FontId) {
        self.font = font;
    }

    // -------------------------------------------------------------------------
    // Row header
    // -------------------------------------------------------------------------

    /// Text shown in the row header
    pub fn header_text(&self, item: ItemId) -> Result<Option<&str>> {
        Ok(self.tree.header(item)?.text.as_deref())
    }

    pub fn set_header_text(&mut self, item: ItemId, text: Option<String>) -> Result<()> {
        self.ensure_alive()?;
        self.tree.header_mut(item)?.text = text;
        Ok(())
    }

    /// Image shown in the row header
    pub fn header_image(&self, item: ItemId) -> Result<Option<ImageId>> {
        Ok(self.tree.header(item)?.image)
    }

    pub fn set_header_image(&mut self, item: ItemId, image: Option<ImageId>) -> Result<()> {
        self.ensure_alive()?;
        self.tree.header_mut(item)?.image = image;
        Ok(())
    }

    /// Header background; `None` means the host's header default.
    pub fn header_background(&self, item: ItemId) -> Result<Option<Color>> {
        Ok(self.tree.header(item)?.background)
    }

    pub fn set_header_background(&mut self, item: ItemId, color: Option<Color>) -> Result<()> {
        self.ensure_alive()?;
        self.tree.header_mut(item)?.background = color;
        Ok(())
    }

    pub fn header_foreground(&self, item: ItemId) -> Result<Option<Color>> {
        Ok(self.tree.header(item)?.foreground)
    }

    pub fn set_header_foreground(&mut self, item: ItemId, color: Option<Color>) -> Result<()> {
        self.ensure_alive()?;
        self.tree.header_mut(item)?.foreground = color;
        Ok(())
    }

    pub fn header_font(&self, item: ItemId) -> Result<Option<FontId>> {
        Ok(self.tree.header(item)?.font)
    }

    pub fn set_header_font(&mut self, item: ItemId, font: Option<FontId>) -> Result<()> {
        self.ensure_alive()?;
        self.tree.header_mut(item)?.font = font;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Checkboxes
    // -------------------------------------------------------------------------

    /// False when the column has no checkboxes, else the cell's own flag.
    pub fn checkable(&self, item: ItemId, column: usize) -> Result<bool> {
        self.check_cell(item, column)?;
        let column_checkable = self.columns.get(column).is_ok_and(|c| c.checkable);
        Ok(column_checkable && self.data.checkable(item, column))
    }

    pub fn set_checkable(&mut self, item: ItemId, column: usize, checkable: bool) -> Result<()> {
        self.check_cell(item, column)?;
        self.data.set_checkable(item, column, checkable);
        Ok(())
    }

    /// Report a checkbox toggle as a selection notification.
    pub fn fire_check_event(&mut self, item: ItemId, column: usize) -> Result<()> {
        self.check_cell(item, column)?;
        self.notifications.push(Notification::Selection {
            item,
            detail: SelectionDetail::Check { column },
        });
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Spans and geometry
    // -------------------------------------------------------------------------

    /// Extra columns the cell extends into
    pub fn column_span(&self, item: ItemId, column: usize) -> Result<i32> {
        self.check_cell(item, column)?;
        Ok(self.data.column_span(item, column))
    }

    pub fn set_column_span(&mut self, item: ItemId, column: usize, span: i32) -> Result<()> {
        self.check_cell(item, column)?;
        self.data.set_column_span(item, column, span);
        self.has_spanning = true;
        Ok(())
    }

    /// Extra rows the cell extends into
    pub fn row_span(&self, item: ItemId, column: usize) -> Result<i32> {
        self.check_cell(item, column)?;
        Ok(self.data.row_span(item, column))
    }

    pub fn set_row_span(&mut self, item: ItemId, column: usize, span: i32) -> Result<()> {
        self.check_cell(item, column)?;
        self.data.set_row_span(item, column, span);
        self.has_spanning = true;
        Ok(())
    }

    /// Cell size including column and row spans.
    ///
    /// Without explicit columns the implicit column fills the cell area.
    pub fn cell_size(&self, item: ItemId, column: usize) -> Result<Size> {
        self.check_cell(item, column)?;
        let own_height = self.tree.height(item)?;
        let row_span = self.data.row_span(item, column);
        let following = self.tree.rows_after(item).filter_map(|id| {
            let node = self.tree.node(id).ok()?;
            Some(RowExtent::new(node.height(), node.is_visible()))
        });

        if self.columns.is_empty() {
            let width = self.viewport.client_area.right() - self.viewport.content_left();
            let height = SpanResolver::span_height(own_height, row_span, following);
            return Ok(Size::new(width.max(0), height));
        }

        Ok(SpanResolver::compute_cell_size(
            self.columns.order(),
            column,
            self.data.column_span(item, column),
            |c| self.columns.effective_width(c),
            own_height,
            row_span,
            following,
        ))
    }

    /// Cell rectangle in client coordinates, whether displayed or not.
    pub fn cell_bounds(&self, item: ItemId, column: usize) -> Result<Rect> {
        let size = self.cell_size(item, column)?;
        let origin = self
            .viewport
            .origin(&self.columns, &self.tree, column, item);
        Ok(SpanResolver::compute_cell_bounds(origin, size))
    }

    /// Like [`Grid::cell_bounds`], but [`Rect::OFF_SCREEN`] when the row is
    /// hidden, not fully displayed, or the column starts under the row
    /// header.
    pub fn cell_bounds_corrected(&self, item: ItemId, column: usize) -> Result<Rect> {
        self.check_cell(item, column)?;
        if !self.tree.is_visible(item)? || !self.is_shown(item) {
            return Ok(Rect::OFF_SCREEN);
        }
        let origin = self
            .viewport
            .origin(&self.columns, &self.tree, column, item);
        if self.viewport.row_header_visible && origin.x < self.viewport.content_left() {
            return Ok(Rect::OFF_SCREEN);
        }
        let size = self.cell_size(item, column)?;
        Ok(SpanResolver::compute_cell_bounds(origin, size))
    }

    // -------------------------------------------------------------------------
    // Renderers
    // -------------------------------------------------------------------------

    /// Install a renderer for one column.
    pub fn set_renderer(&mut self, column: usize, renderer: Box<dyn CellRenderer>) {
        self.renderers.insert(column, renderer);
    }

    /// Renderer for a column, falling back to the built-in one.
    pub fn renderer(&self, column: usize) -> &dyn CellRenderer {
        match self.renderers.get(&column) {
            Some(renderer) => renderer.as_ref(),
            None => &self.default_renderer,
        }
    }

    /// What a renderer needs to know about a cell.
    pub fn cell_context(&self, item: ItemId, column: usize) -> Result<CellContext> {
        self.check_cell(item, column)?;
        let node = self.tree.node(item)?;
        let checkable = self.columns.get(column).is_ok_and(|c| c.checkable);
        Ok(CellContext {
            item,
            column,
            level: node.level(),
            has_children: node.has_children(),
            tree_column: self.columns.is_tree(column),
            check: checkable,
        })
    }

    /// Text area of a cell relative to its top-left corner.
    pub fn text_bounds(
        &self,
        item: ItemId,
        column: usize,
        include_selection_offset: bool,
    ) -> Result<Rect> {
        let cell = self.cell_context(item, column)?;
        Ok(self
            .renderer(column)
            .text_bounds(&cell, include_selection_offset))
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Append a column. Every row is re-armed for virtual data.
    pub fn add_column(&mut self, column: Column) -> Result<usize> {
        self.ensure_alive()?;
        let index = self.columns.push(column)?;
        self.virtual_data.reset_all(&mut self.tree);
        self.mark_scroll_obsolete();
        log::debug!("added column {index}");
        Ok(index)
    }

    /// Create an empty column group.
    pub fn add_column_group(&mut self, expanded: bool) -> GroupId {
        self.columns.add_group(expanded)
    }

    fn column_offsets(&self) -> Vec<i32> {
        (0..self.columns.len())
            .map(|c| self.columns.x_offset(c))
            .collect()
    }

    /// Publish `ColumnMoved` for every column whose left edge moved.
    fn publish_shifted(&mut self, before: &[i32], skip: Option<usize>) {
        let after = self.column_offsets();
        for (column, (old, new)) in before.iter().zip(&after).enumerate() {
            if old != new && Some(column) != skip {
                self.listeners.publish(StructuralEvent::ColumnMoved(column));
            }
        }
    }

    /// Resize a column, publishing `ColumnResized` and moves of later columns.
    pub fn set_column_width(&mut self, column: usize, width: i32) -> Result<()> {
        self.ensure_alive()?;
        let before = self.column_offsets();
        if self.columns.set_width(column, width)? {
            self.listeners.publish(StructuralEvent::ColumnResized(column));
            self.publish_shifted(&before, None);
            self.mark_scroll_obsolete();
        }
        Ok(())
    }

    /// Show or hide a column, publishing the change and moves of later columns.
    pub fn set_column_visible(&mut self, column: usize, visible: bool) -> Result<()> {
        self.ensure_alive()?;
        let before = self.column_offsets();
        if self.columns.set_visible(column, visible)? {
            self.listeners.publish(if visible {
                StructuralEvent::ColumnShown(column)
            } else {
                StructuralEvent::ColumnHidden(column)
            });
            self.publish_shifted(&before, Some(column));
            self.mark_scroll_obsolete();
        }
        Ok(())
    }

    /// # Errors
    /// `InvalidArgument` unless `order` is a permutation of all columns.
    pub fn set_column_order(&mut self, order: Vec<usize>) -> Result<()> {
        self.ensure_alive()?;
        let before = self.column_offsets();
        let moved = self.columns.set_order(order)?;
        for column in &moved {
            self.listeners.publish(StructuralEvent::ColumnMoved(*column));
        }
        let after = self.column_offsets();
        for (column, (old, new)) in before.iter().zip(&after).enumerate() {
            if old != new && !moved.contains(&column) {
                self.listeners.publish(StructuralEvent::ColumnMoved(column));
            }
        }
        Ok(())
    }

    /// Expand or collapse a column group, toggling its detail and summary columns.
    pub fn set_group_expanded(&mut self, group: GroupId, expanded: bool) -> Result<()> {
        self.ensure_alive()?;
        let before = self.column_offsets();
        if self.columns.set_group_expanded(group, expanded)? {
            self.listeners.publish(if expanded {
                StructuralEvent::GroupExpanded(group)
            } else {
                StructuralEvent::GroupCollapsed(group)
            });
            self.publish_shifted(&before, None);
            self.mark_scroll_obsolete();
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Viewport
    // -------------------------------------------------------------------------

    /// Resize the client area and publish `Resized`.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        self.ensure_alive()?;
        self.viewport.resize(width, height);
        self.mark_scroll_obsolete();
        self.listeners.publish(StructuralEvent::Resized);
        Ok(())
    }

    /// Scroll vertically to the `row`th visible row.
    pub fn set_scroll_row(&mut self, row: usize) -> Result<()> {
        self.ensure_alive()?;
        self.viewport.set_scroll_row(row, &self.tree);
        self.listeners
            .publish(StructuralEvent::Scrolled(ScrollAxis::Vertical));
        Ok(())
    }

    /// Scroll horizontally to `x` pixels, clamped to the content width.
    pub fn set_scroll_x(&mut self, x: i32) -> Result<()> {
        self.ensure_alive()?;
        self.viewport.set_scroll_x(x, &self.columns);
        self.listeners
            .publish(StructuralEvent::Scrolled(ScrollAxis::Horizontal));
        Ok(())
    }

    pub fn set_row_header_visible(&mut self, visible: bool) {
        self.viewport.row_header_visible = visible;
        self.viewport.invalidate_range();
    }

    pub fn set_lines_visible(&mut self, visible: bool) {
        self.viewport.lines_visible = visible;
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Register a listener mailbox for structural events.
    pub fn register_listener(&mut self) -> ListenerId {
        self.listeners.register()
    }

    /// Drop a listener and all of its subscriptions.
    pub fn unregister_listener(&mut self, id: ListenerId) {
        self.listeners.unregister(id);
    }

    /// Subscribe to a topic. Returns false if already subscribed.
    pub fn subscribe(&mut self, id: ListenerId, topic: Topic) -> bool {
        self.listeners.subscribe(id, topic)
    }

    /// Unsubscribe from a topic. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId, topic: Topic) -> bool {
        self.listeners.unsubscribe(id, topic)
    }

    pub fn is_subscribed(&self, id: ListenerId, topic: Topic) -> bool {
        self.listeners.is_subscribed(id, topic)
    }

    pub fn subscription_count(&self, id: ListenerId) -> usize {
        self.listeners.subscription_count(id)
    }

    /// Take a listener's pending structural events.
    pub fn drain_events(&mut self, id: ListenerId) -> Vec<StructuralEvent> {
        self.listeners.drain(id)
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Tear down every row at once. Later mutations fail with
    /// `DisposedAccess`; listeners stay registered so they can detach.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let removed = self.tree.clear();
        for id in &removed {
            self.data.clear_row(*id);
        }
        self.selection.clear();
        self.focus = None;
        self.viewport.invalidate_range();
        self.notifications.clear();
        self.disposed = true;
        log::debug!("grid disposed ({} rows)", removed.len());
    }
}

impl Disposable for Grid {
    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
