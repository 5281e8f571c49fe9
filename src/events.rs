//! Typed observer lists for the host's notifications.
//!
//! Every notification the host raises has its own [`EventList`] in
//! [`HostEvents`]. Handlers may fail; raising stops at the first failing
//! handler and hands its error back to the operation that raised the event.
//! Handlers may freely re-enter the host, including subscribing or
//! unsubscribing handlers of the event currently being raised.

use std::any::Any ;
use std::cell::{ Cell, RefCell };
use std::rc::Rc ;

use crate::{ ComponentHandle, DesignerError, DesignerHost };



/// Identifies a subscription so it can be removed again.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub struct HandlerId( u64 );

impl HandlerId {
	pub const fn new( id: u64 ) -> Self { Self( id )}
}

impl From<HandlerId> for u64 {
	fn from( id: HandlerId ) -> Self { id.0 }
}

type Handler<A> = Rc<dyn Fn( &DesignerHost, &A ) -> Result<(), DesignerError>> ;

/// Handlers for a single kind of notification, called in subscription order.
pub struct EventList<A> {
	handlers: RefCell<Vec<( HandlerId, Handler<A> )>>,
	next_id: Cell<u64>,
}

impl<A> Default for EventList<A> {
	fn default() -> Self { Self { handlers: RefCell::new( Vec::new() ), next_id: Cell::new( 0 ) }}
}

impl<A> EventList<A> {

	/// Adds a handler.
	pub fn subscribe( &self, handler: impl Fn( &DesignerHost, &A ) -> Result<(), DesignerError> + 'static ) -> HandlerId {
		let id = HandlerId( self.next_id.get() );
		self.next_id.set( id.0 + 1 );
		self.handlers.borrow_mut().push(( id, Rc::new( handler )));
		id
	}

	/// Removes a handler; returns whether it was subscribed.
	pub fn unsubscribe( &self, id: HandlerId ) -> bool {
		let mut handlers = self.handlers.borrow_mut();
		let before = handlers.len();
		handlers.retain(|( handler_id, _ )| *handler_id != id );
		handlers.len() != before
	}

	#[inline] pub fn len( &self ) -> usize { self.handlers.borrow().len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.handlers.borrow().is_empty() }

	pub(crate) fn clear( &self ) { self.handlers.borrow_mut().clear() }

	/// Calls every handler with `args`, stopping at the first error.
	pub(crate) fn raise( &self, host: &DesignerHost, args: &A ) -> Result<(), DesignerError> {
		// Snapshot first: handlers may subscribe or unsubscribe while we iterate.
		let handlers = self.handlers.borrow().iter()
			.map(|( _, handler )| Rc::clone( handler ))
			.collect::<Vec<_>>();
		handlers.iter().try_for_each(| handler | handler( host, args ))
	}

}

impl<A> std::fmt::Debug for EventList<A> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "EventList" ).field( "handlers", &self.len() ).finish()
	}
}

/// A component is being added or removed, or has been.
#[derive( Debug, Clone )]
pub struct ComponentEvent {
	pub component: ComponentHandle,
}

/// A component member is about to change.
#[derive( Debug, Clone )]
pub struct ComponentChanging {
	pub component: ComponentHandle,
	pub member: Option<String>,
}

/// A component member has changed.
#[derive( Clone )]
pub struct ComponentChanged {
	pub component: ComponentHandle,
	pub member: Option<String>,
	pub old_value: Option<Rc<dyn Any>>,
	pub new_value: Option<Rc<dyn Any>>,
}

impl std::fmt::Debug for ComponentChanged {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ComponentChanged" )
			.field( "component", &self.component )
			.field( "member", &self.member )
			.finish_non_exhaustive()
	}
}

/// A sited component was renamed.
#[derive( Debug, Clone )]
pub struct ComponentRename {
	pub component: ComponentHandle,
	pub old_name: String,
	pub new_name: String,
}

/// A transaction is closing or has closed.
#[derive( Debug, Clone, Copy, Eq, PartialEq )]
pub struct TransactionClose {
	/// `true` for a commit, `false` for a cancel.
	pub committed: bool,
	/// Whether no other transaction remains open.
	pub last_transaction: bool,
}

/// Raised by a [`DesignerEventService`]( crate::DesignerEventService ) when the active host changes.
#[derive( Debug, Clone )]
pub struct ActiveDesignerChanged {
	pub old_designer: Option<DesignerHost>,
	pub new_designer: Option<DesignerHost>,
}

/// Every notification the host raises.
#[derive( Debug, Default )]
pub struct HostEvents {
	pub component_adding: EventList<ComponentEvent>,
	pub component_added: EventList<ComponentEvent>,
	pub component_removing: EventList<ComponentEvent>,
	pub component_removed: EventList<ComponentEvent>,
	pub component_changing: EventList<ComponentChanging>,
	pub component_changed: EventList<ComponentChanged>,
	pub component_rename: EventList<ComponentRename>,
	pub transaction_opening: EventList<()>,
	pub transaction_opened: EventList<()>,
	pub transaction_closing: EventList<TransactionClose>,
	pub transaction_closed: EventList<TransactionClose>,
	pub load_complete: EventList<()>,
	pub activated: EventList<()>,
	pub deactivated: EventList<()>,
}

impl HostEvents {

	pub(crate) fn clear( &self ) {
		self.component_adding.clear();
		self.component_added.clear();
		self.component_removing.clear();
		self.component_removed.clear();
		self.component_changing.clear();
		self.component_changed.clear();
		self.component_rename.clear();
		self.transaction_opening.clear();
		self.transaction_opened.clear();
		self.transaction_closing.clear();
		self.transaction_closed.clear();
		self.load_complete.clear();
		self.activated.clear();
		self.deactivated.clear();
	}

}
