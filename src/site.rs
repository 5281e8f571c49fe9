//! Sites: the record binding a component to its container.
//!
//! A [`Site`] exists for as long as its component is a member of a container
//! in the host. It carries the component's name, a small key/value dictionary
//! for designers to stash per-component state, and any nested containers the
//! component hosts.

use std::any::{ Any, TypeId };
use std::cell::{ Cell, RefCell };
use std::collections::HashMap ;
use std::rc::{ Rc, Weak };
use indexmap::IndexMap ;

use crate::{ ComponentHandle, Container, DesignerError, DesignerHost, ServiceProvider };
use crate::container::ContainerCore ;
use crate::host::HostInner ;



pub(crate) struct SiteInner {
	component: ComponentHandle,
	container: Weak<ContainerCore>,
	host: Weak<HostInner>,
	name: RefCell<String>,
	disposed: Cell<bool>,
	dictionary: RefCell<HashMap<String, Rc<dyn Any>>>,
	/// Keyed by sub-container name; the unnamed container uses `""`.
	nested: RefCell<IndexMap<String, Container>>,
}

/// Binds one component to its container, name and nested scope.
///
/// Cloning the site creates another reference to the same record.
#[derive( Clone )]
pub struct Site( Rc<SiteInner> );

impl Site {

	pub(crate) fn new( component: ComponentHandle, container: &Container, host: &DesignerHost, name: String ) -> Self {
		Self( Rc::new( SiteInner {
			component,
			container: container.downgrade(),
			host: host.downgrade(),
			name: RefCell::new( name ),
			disposed: Cell::new( false ),
			dictionary: RefCell::default(),
			nested: RefCell::default(),
		}))
	}

	/// The sited component.
	#[inline] pub fn component( &self ) -> &ComponentHandle { &self.0.component }

	/// The container the component belongs to, while the host is alive.
	pub fn container( &self ) -> Option<Container> { self.0.container.upgrade().map( Container::from_core ) }

	/// The host that owns the container.
	pub fn host( &self ) -> Option<DesignerHost> { self.0.host.upgrade().map( DesignerHost::from_inner ) }

	/// The component's name within its container.
	pub fn name( &self ) -> String { self.0.name.borrow().clone() }

	/// The name qualified by the owners of every enclosing nested container,
	/// e.g. `"form1.panel1.button1"`. Equal to [`name`]( Self::name ) for
	/// components of the host's own container.
	pub fn full_name( &self ) -> String {
		let name = self.name();
		match self.container().and_then(| container | container.owner_name() ) {
			Some( owner ) => format!( "{}.{}", owner, name ),
			None => name,
		}
	}

	/// Whether the component has been removed from its container.
	#[inline] pub fn is_disposed( &self ) -> bool { self.0.disposed.get() }

	pub(crate) fn mark_disposed( &self ) { self.0.disposed.set( true ) }

	pub(crate) fn is_in( &self, container: &Container ) -> bool {
		self.container().is_some_and(| own | own == *container )
	}

	/// Renames the component.
	///
	/// `None` is treated as the empty name. Renaming to another spelling of the
	/// current name (only case differs) is always allowed.
	///
	/// # Errors
	/// - [`DesignerError::DuplicateName`] if another component of the container has the name.
	/// - Whatever the name creation service reports for an invalid name.
	/// - Errors raised by `ComponentRename` handlers; the rename has already happened.
	pub fn set_name( &self, name: Option<&str> ) -> Result<(), DesignerError> {

		let name = name.unwrap_or_default();
		if *self.0.name.borrow() == name { return Ok(()) }

		let mut validate = true ;
		if !name.is_empty() {
			if let Some( named ) = self.container().and_then(| container | container.component( name )) {
				validate = named != self.0.component ;
				if validate { return Err( DesignerError::DuplicateName( name.to_string() )) }
			}
		}

		let host = self.host();
		if validate {
			if let Some( service ) = host.as_ref().and_then(| host | host.name_creation_service( self )) {
				service.validate_name( name )?;
			}
		}

		let old_name = self.0.name.replace( name.to_string() );
		match host {
			Some( host ) => host.on_component_rename( &self.0.component, old_name, name.to_string() ),
			None => Ok(()),
		}

	}

	/// The nested container named `name` that this component owns, created on
	/// first request and kept for the lifetime of the site.
	///
	/// # Errors
	/// [`DesignerError::Disposed`] if the host no longer exists.
	pub fn nested_container( &self, name: Option<&str> ) -> Result<Container, DesignerError> {
		let key = name.unwrap_or_default();
		if let Some( existing ) = self.0.nested.borrow().get( key ) { return Ok( existing.clone() ) }
		let host = self.host().ok_or( DesignerError::Disposed )?;
		let container = Container::new_nested( &host, self.0.component.clone(), name.filter(| name | !name.is_empty() ).map( str::to_string ));
		self.0.nested.borrow_mut().insert( key.to_string(), container.clone() );
		Ok( container )
	}

	/// Every nested container created so far.
	pub fn nested_containers( &self ) -> Vec<Container> {
		self.0.nested.borrow().values().cloned().collect()
	}

	pub(crate) fn take_nested_containers( &self ) -> Vec<Container> {
		self.0.nested.borrow_mut().drain( .. ).map(|( _, container )| container ).collect()
	}

	/// Dictionary value stored under `key`.
	pub fn get_value( &self, key: &str ) -> Option<Rc<dyn Any>> {
		self.0.dictionary.borrow().get( key ).cloned()
	}

	/// The key `value` is stored under, compared by identity.
	pub fn get_key( &self, value: &Rc<dyn Any> ) -> Option<String> {
		self.0.dictionary.borrow().iter()
			.find(|( _, stored )| Rc::ptr_eq( stored, value ))
			.map(|( key, _ )| key.clone() )
	}

	/// Stores `value` under `key`; `None` removes the key.
	pub fn set_value( &self, key: impl Into<String>, value: Option<Rc<dyn Any>> ) {
		let key = key.into();
		let mut dictionary = self.0.dictionary.borrow_mut();
		match value {
			Some( value ) => { dictionary.insert( key, value ); }
			None => { dictionary.remove( &key ); }
		}
	}

}

impl ServiceProvider for Site {
	fn service_entry( &self, service: TypeId ) -> Option<Rc<dyn Any>> {
		self.container()?.service_entry( service )
	}
}

impl PartialEq for Site {
	fn eq( &self, other: &Self ) -> bool { Rc::ptr_eq( &self.0, &other.0 ) }
}
impl Eq for Site {}

impl std::fmt::Debug for Site {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Site" )
			.field( "component", &self.0.component )
			.field( "name", &*self.0.name.borrow() )
			.field( "disposed", &self.0.disposed.get() )
			.finish_non_exhaustive()
	}
}

/// Component names compare without regard to case.
pub(crate) fn names_match( a: &str, b: &str ) -> bool {
	a.eq_ignore_ascii_case( b ) || a.to_lowercase() == b.to_lowercase()
}
