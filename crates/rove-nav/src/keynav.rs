//! The navigable container.
//!
//! [`KeyNav`] owns a [`Document`] and one container node inside it.  It
//! turns key events into focus moves among the container's candidates,
//! keeps the roving tab stop consistent, and runs type-ahead search.  What
//! the arrow keys *mean* is left to a [`NavHandler`]: a toolbar moves left
//! and right, a menu up and down, a tree may expand or collapse.
//!
//! Focus is requested, not assumed.  [`Nav::focus_child`] asks the document
//! for focus and returns a [`Message::FocusIn`] command; the focused child
//! only changes when that notification is processed, so a refused or
//! redirected request never leaves stale state behind.
//!
//! # Example
//!
//! ```rust,ignore
//! use rove_nav::{KeyNav, Linear, Message};
//!
//! let mut prog = TestProgram::new(KeyNav::new(doc, root, Linear::vertical()));
//! prog.dispatch(Message::Key(NavEvent::from_code(KeyCode::Home, root)));
//! prog.dispatch(Message::Key(NavEvent::from_code(KeyCode::Char('b'), root)));
//! ```

use crate::focus::RovingFocus;
use crate::key::{takes_input, KeyCodeMap, KeyTable, NavAction, NavKey};
use crate::search::{self, SearchMatch, SearchResult, SearchState};
use crate::selector::ChildSelector;
use crate::traversal::{self, Direction};
use rove_core::dom::{Document, FocusPosition, NodeId};
use rove_core::event::NavEvent;
use rove_core::subscription::{subscribe, Subscription};
use rove_core::subscriptions::After;
use rove_core::{Command, Component};
use std::time::Duration;

/// Messages understood by [`KeyNav`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A key went down.
    KeyDown(NavEvent),
    /// A printable key produced a character.
    KeyPress(NavEvent),
    /// A key-down followed by its key-press, unless the key-down prevented it.
    Key(NavEvent),
    /// The given node received focus.
    FocusIn(NodeId),
    /// Focus left the container and everything it owns.
    Blur,
    /// Programmatic focus on the container.
    Focus,
    /// The type-ahead window for the given generation elapsed.
    SearchExpired(u64),
}

/// Configuration for a [`KeyNav`].
#[derive(Debug, Clone)]
pub struct NavOptions {
    /// How long keystrokes keep accumulating into one search.
    pub multi_char_search_duration: Duration,
    pub child_selector: ChildSelector,
    pub key_table: KeyTable,
    /// Node whose direct children are candidates under the default selector.
    /// Defaults to the container itself.
    pub container_node: Option<NodeId>,
    /// Tab index given to the container at setup if it has none.
    pub default_tab_index: i32,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            multi_char_search_duration: Duration::from_millis(1000),
            child_selector: ChildSelector::default(),
            key_table: KeyTable::default(),
            container_node: None,
            default_tab_index: 0,
        }
    }
}

impl NavOptions {
    pub fn with_search_duration(mut self, duration: Duration) -> Self {
        self.multi_char_search_duration = duration;
        self
    }

    pub fn with_child_selector(mut self, selector: ChildSelector) -> Self {
        self.child_selector = selector;
        self
    }

    pub fn with_key_table(mut self, table: KeyTable) -> Self {
        self.key_table = table;
        self
    }

    pub fn with_container_node(mut self, node: NodeId) -> Self {
        self.container_node = Some(node);
        self
    }

    pub fn with_default_tab_index(mut self, tab_index: i32) -> Self {
        self.default_tab_index = tab_index;
        self
    }
}

/// Document, candidates, and roving focus, as seen by a [`NavHandler`].
pub struct Nav {
    document: Document,
    root: NodeId,
    container_node: NodeId,
    selector: ChildSelector,
    roving: RovingFocus,
}

impl Nav {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The container node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn focused_child(&self) -> Option<NodeId> {
        self.roving.focused_child()
    }

    pub fn roving(&self) -> &RovingFocus {
        &self.roving
    }

    /// Whether `node` is a navigable descendant of the container.
    pub fn is_candidate(&self, node: NodeId) -> bool {
        node != self.root && self.document.contains(self.root, node) && self.selects(node)
    }

    fn selects(&self, node: NodeId) -> bool {
        let container = self.container_node;
        self.selector.matches(&self.document, container, node)
    }

    /// The candidate after (or before) `from`, wrapping.
    ///
    /// Pass the container to get the first or last candidate.
    pub fn next(&self, from: NodeId, direction: Direction) -> Option<NodeId> {
        let selects = |n| self.selects(n);
        traversal::next(&self.document, self.root, from, direction, selects)
    }

    pub fn first(&self) -> Option<NodeId> {
        self.next(self.root, Direction::Forward)
    }

    pub fn last(&self) -> Option<NodeId> {
        self.next(self.root, Direction::Backward)
    }

    /// All candidates in document order.
    pub fn candidates(&self) -> Vec<NodeId> {
        traversal::candidates(&self.document, self.root, |n| self.selects(n))
    }

    /// The nearest candidate at or above `node`, or the container.
    pub fn target_element(&self, node: NodeId) -> NodeId {
        std::iter::successors(Some(node), |&n| self.document.parent(n))
            .take_while(|&n| n != self.root)
            .find(|&n| self.is_candidate(n))
            .unwrap_or(self.root)
    }

    /// Lend the tab stop to `child` and request focus on it.
    ///
    /// A child with a focus node delegates to it.  The returned command
    /// carries the [`Message::FocusIn`] confirmation; if the document
    /// refuses focus the child's tab index is put back and nothing is sent.
    pub fn focus_child(&mut self, child: NodeId, position: FocusPosition) -> Command<Message> {
        let target = self
            .document
            .focus_node(child)
            .filter(|&n| self.document.contains(child, n))
            .unwrap_or(child);
        let previous = self
            .document
            .attribute(child, "tabindex")
            .map(str::to_string);

        let lent = self.roving.lend(&mut self.document, self.root, child);
        if !self.document.focus(target, position) {
            self.roving.withdraw(child);
            match previous {
                Some(value) => self.document.set_attribute(child, "tabindex", value),
                None => self.document.remove_attribute(child, "tabindex"),
            }
            tracing::debug!(message = "keynav.focus_refused", child = child.index());
            return Command::none();
        }

        tracing::debug!(
            message = "keynav.focus_child",
            child = child.index(),
            target = target.index(),
            tab_index = lent
        );
        Command::message(Message::FocusIn(target))
    }

    pub fn focus_first(&mut self) -> Command<Message> {
        match self.first() {
            Some(child) => self.focus_child(child, FocusPosition::Start),
            None => Command::none(),
        }
    }

    pub fn focus_last(&mut self) -> Command<Message> {
        match self.last() {
            Some(child) => self.focus_child(child, FocusPosition::Start),
            None => Command::none(),
        }
    }

    /// The focused child, unless it has since been destroyed or moved out.
    fn live_focused_child(&self) -> Option<NodeId> {
        self.focused_child()
            .filter(|&n| !self.document.is_destroyed(n) && self.is_candidate(n))
    }
}

/// Behavior a concrete widget plugs into a [`KeyNav`].
///
/// Every method has a default, so `impl NavHandler for MyWidget {}` yields a
/// container that supports Home/End and type-ahead but ignores arrows.
#[allow(unused_variables)]
pub trait NavHandler: Send + 'static {
    /// Left arrow, or right arrow in a right-to-left container.
    fn on_left_arrow(
        &mut self,
        nav: &mut Nav,
        event: &NavEvent,
        focused: Option<NodeId>,
    ) -> Command<Message> {
        Command::none()
    }

    /// Right arrow, or left arrow in a right-to-left container.
    fn on_right_arrow(
        &mut self,
        nav: &mut Nav,
        event: &NavEvent,
        focused: Option<NodeId>,
    ) -> Command<Message> {
        Command::none()
    }

    fn on_up_arrow(
        &mut self,
        nav: &mut Nav,
        event: &NavEvent,
        focused: Option<NodeId>,
    ) -> Command<Message> {
        Command::none()
    }

    fn on_down_arrow(
        &mut self,
        nav: &mut Nav,
        event: &NavEvent,
        focused: Option<NodeId>,
    ) -> Command<Message> {
        Command::none()
    }

    /// Compare a candidate against the type-ahead query.
    fn keyboard_search_compare(&self, nav: &Nav, item: NodeId, query: &str) -> SearchMatch {
        search::default_compare(nav.document(), item, query)
    }

    /// React to a finished scan. The default focuses the match.
    fn on_keyboard_search(
        &mut self,
        nav: &mut Nav,
        result: &SearchResult,
        event: &NavEvent,
    ) -> Command<Message> {
        match result.item {
            Some(item) => nav.focus_child(item, FocusPosition::Start),
            None => Command::none(),
        }
    }
}

impl NavHandler for () {}

/// Which arrow pair a [`Linear`] handler listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Moves focus to the previous or next candidate, wrapping.
///
/// Horizontal containers (toolbars, tab bars) use left/right; vertical
/// ones (menus, lists) use up/down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Linear {
    pub orientation: Orientation,
}

impl Linear {
    pub fn horizontal() -> Self {
        Self {
            orientation: Orientation::Horizontal,
        }
    }

    pub fn vertical() -> Self {
        Self {
            orientation: Orientation::Vertical,
        }
    }

    fn step(
        &self,
        axis: Orientation,
        nav: &mut Nav,
        focused: Option<NodeId>,
        direction: Direction,
    ) -> Command<Message> {
        if axis != self.orientation {
            return Command::none();
        }
        let from = focused.unwrap_or(nav.root());
        match nav.next(from, direction) {
            Some(child) => nav.focus_child(child, FocusPosition::Start),
            None => Command::none(),
        }
    }
}

impl NavHandler for Linear {
    fn on_left_arrow(
        &mut self,
        nav: &mut Nav,
        _: &NavEvent,
        focused: Option<NodeId>,
    ) -> Command<Message> {
        self.step(Orientation::Horizontal, nav, focused, Direction::Backward)
    }

    fn on_right_arrow(
        &mut self,
        nav: &mut Nav,
        _: &NavEvent,
        focused: Option<NodeId>,
    ) -> Command<Message> {
        self.step(Orientation::Horizontal, nav, focused, Direction::Forward)
    }

    fn on_up_arrow(
        &mut self,
        nav: &mut Nav,
        _: &NavEvent,
        focused: Option<NodeId>,
    ) -> Command<Message> {
        self.step(Orientation::Vertical, nav, focused, Direction::Backward)
    }

    fn on_down_arrow(
        &mut self,
        nav: &mut Nav,
        _: &NavEvent,
        focused: Option<NodeId>,
    ) -> Command<Message> {
        self.step(Orientation::Vertical, nav, focused, Direction::Forward)
    }
}

/// A container with arrow-key navigation, a roving tab stop, and type-ahead.
pub struct KeyNav<H: NavHandler> {
    nav: Nav,
    handler: H,
    keys: KeyCodeMap,
    search: SearchState,
    options: NavOptions,
    right_to_left: bool,
}

impl<H: NavHandler> KeyNav<H> {
    /// Set up `root` as a navigable container with default options.
    pub fn new(document: Document, root: NodeId, handler: H) -> Self {
        Self::with_options(document, root, handler, NavOptions::default())
    }

    /// Set up `root` as a navigable container.
    ///
    /// Gives the container the default tab index if it has none and fixes
    /// the writing direction; later `dir` changes are not picked up.
    pub fn with_options(
        mut document: Document,
        root: NodeId,
        handler: H,
        options: NavOptions,
    ) -> Self {
        if !document.has_attribute(root, "tabindex") {
            document.set_tab_index(root, options.default_tab_index);
        }
        let right_to_left = document.is_right_to_left(root);
        let keys = KeyCodeMap::build(&options.key_table, right_to_left);
        tracing::debug!(message = "keynav.setup", root = root.index(), right_to_left);

        Self {
            nav: Nav {
                document,
                root,
                container_node: options.container_node.unwrap_or(root),
                selector: options.child_selector.clone(),
                roving: RovingFocus::new(),
            },
            handler,
            keys,
            search: SearchState::new(),
            options,
            right_to_left,
        }
    }

    pub fn nav(&self) -> &Nav {
        &self.nav
    }

    pub fn nav_mut(&mut self) -> &mut Nav {
        &mut self.nav
    }

    pub fn document(&self) -> &Document {
        self.nav.document()
    }

    pub fn document_mut(&mut self) -> &mut Document {
        self.nav.document_mut()
    }

    pub fn root(&self) -> NodeId {
        self.nav.root()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn options(&self) -> &NavOptions {
        &self.options
    }

    pub fn focused_child(&self) -> Option<NodeId> {
        self.nav.focused_child()
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn is_right_to_left(&self) -> bool {
        self.right_to_left
    }

    pub fn target_element(&self, node: NodeId) -> NodeId {
        self.nav.target_element(node)
    }

    /// Focus the first candidate.
    pub fn focus(&mut self) -> Command<Message> {
        self.nav.focus_first()
    }

    pub fn focus_first(&mut self) -> Command<Message> {
        self.nav.focus_first()
    }

    pub fn focus_last(&mut self) -> Command<Message> {
        self.nav.focus_last()
    }

    pub fn focus_child(&mut self, child: NodeId, position: FocusPosition) -> Command<Message> {
        self.nav.focus_child(child, position)
    }

    /// Close the search window. Dropping the pending timer follows from the
    /// next subscription reconcile.
    pub fn teardown(&mut self) {
        self.search.reset();
    }

    /// Handle a key-down.
    ///
    /// Mapped keys stop propagation, prevent the default action, and end any
    /// type-ahead in progress.  Caret keys inside a text control are left to
    /// the control.
    pub fn key_down(&mut self, event: &mut NavEvent) -> Command<Message> {
        let code = event.code();
        let table = &self.options.key_table;
        if table.is_caret_key(code) && takes_input(self.nav.document(), event.target) {
            return Command::none();
        }

        if let Some(action) = self.keys.action(code) {
            let nav = &mut self.nav;
            let handler = &mut self.handler;
            let focused = nav.focused_child();
            tracing::debug!(message = "keynav.key_down", ?code, ?action);
            let cmd = match action {
                NavAction::FocusFirst => nav.focus_first(),
                NavAction::FocusLast => nav.focus_last(),
                NavAction::LeftArrow => handler.on_left_arrow(nav, event, focused),
                NavAction::RightArrow => handler.on_right_arrow(nav, event, focused),
                NavAction::UpArrow => handler.on_up_arrow(nav, event, focused),
                NavAction::DownArrow => handler.on_down_arrow(nav, event, focused),
            };
            event.stop_propagation();
            event.prevent_default();
            self.search.reset();
            return cmd;
        }

        let searching = self.search.is_armed() && !event.has_command_modifier();
        if searching && table.is(NavKey::Space, code) {
            event.prevent_default();
            return self.keyboard_search(event, ' ');
        }
        Command::none()
    }

    /// Handle a key-press: printable characters feed type-ahead.
    pub fn key_press(&mut self, event: &mut NavEvent) -> Command<Message> {
        let Some(ch) = event.char_code() else {
            return Command::none();
        };
        let doc = self.nav.document();
        if takes_input(doc, event.target) || ch <= ' ' || event.has_command_modifier() {
            return Command::none();
        }
        let toggles = doc
            .input_type(event.target)
            .is_some_and(|t| t == "checkbox" || t == "radio");
        if toggles && (ch == ' ' || ch == '\r') {
            return Command::none();
        }

        event.prevent_default();
        event.stop_propagation();
        self.keyboard_search(event, ch)
    }

    /// Add `ch` to the type-ahead query and scan for a match.
    pub fn keyboard_search(&mut self, event: &NavEvent, ch: char) -> Command<Message> {
        let query = self.search.push(ch);
        let focused = self.nav.live_focused_child();
        let advance = self.search.query_len() == 1 || focused.is_none();

        let nav = &self.nav;
        let handler = &self.handler;
        let result = search::scan(
            focused,
            &query,
            advance,
            |from| nav.next(from.unwrap_or(nav.root), Direction::Forward),
            |item, q| handler.keyboard_search_compare(nav, item, q),
        );

        let Some(result) = result else {
            tracing::debug!(message = "keynav.search", query = %query, candidates = 0);
            return Command::none();
        };
        tracing::debug!(
            message = "keynav.search",
            query = %result.query,
            item = ?result.item,
            matches = ?result.matches
        );
        let nav = &mut self.nav;
        self.handler.on_keyboard_search(nav, &result, event)
    }

    fn on_focus_in(&mut self, node: NodeId) -> Command<Message> {
        let root = self.nav.root;
        if !self.nav.document.contains(root, node) {
            tracing::trace!(message = "keynav.focus_outside", node = node.index());
            return Command::none();
        }

        let target = self.nav.target_element(node);
        let document = &mut self.nav.document;
        let roving = &mut self.nav.roving;
        if target == root {
            if !roving.on_container_focus(document, root) {
                return Command::none();
            }
            tracing::debug!(message = "keynav.container_focus", root = root.index());
            return self.focus();
        }

        if roving.on_child_focus(document, root, target) {
            tracing::debug!(message = "keynav.child_focus", child = target.index());
        }
        Command::none()
    }

    fn on_blur(&mut self) {
        let root = self.nav.root;
        self.nav.roving.on_blur(&mut self.nav.document, root);
        tracing::debug!(message = "keynav.blur", root = root.index());
    }
}

impl<H: NavHandler> Component for KeyNav<H> {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyDown(mut event) => self.key_down(&mut event),
            Message::KeyPress(mut event) => self.key_press(&mut event),
            Message::Key(mut event) => {
                let down = self.key_down(&mut event);
                if event.default_prevented() {
                    return down;
                }
                let press = self.key_press(&mut event);
                Command::batch([down, press])
            }
            Message::FocusIn(node) => self.on_focus_in(node),
            Message::Blur => {
                self.on_blur();
                Command::none()
            }
            Message::Focus => self.focus(),
            Message::SearchExpired(generation) => {
                if self.search.expire(generation) {
                    tracing::trace!(message = "keynav.search_expired", generation);
                }
                Command::none()
            }
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if !self.search.is_armed() {
            return vec![];
        }
        let key = self.search.generation();
        let delay = self.options.multi_char_search_duration;
        let timer = After::new(delay).with_key(key);
        vec![subscribe(timer).map(move |_| Message::SearchExpired(key))]
    }

    fn focused(&self) -> bool {
        self.nav
            .document
            .active_element()
            .is_some_and(|n| self.nav.document.contains(self.nav.root, n))
    }
}
