//! Containers of sited components.
//!
//! Every host has one root [`Container`]. A component can additionally own
//! nested containers (see [`Site::nested_container`]), which lets a component
//! host sub-components of its own. Both kinds route [`add`]( Container::add )
//! and [`remove`]( Container::remove ) through the same host protocol, so
//! designers, extender providers and events behave identically at any depth.

use std::any::{ Any, TypeId };
use std::cell::{ Cell, OnceCell, RefCell };
use std::rc::{ Rc, Weak };
use indexmap::IndexMap ;
use tracing::warn ;

use crate::{ ComponentHandle, DesignerError, DesignerHost, InheritanceLevel, ServiceContainer, ServiceProvider, Site };
use crate::host::HostInner ;
use crate::site::names_match ;



pub(crate) enum ContainerKind {
	Host,
	Nested( NestedScope ),
}

pub(crate) struct NestedScope {
	owner: ComponentHandle,
	name: Option<String>,
	services: OnceCell<ServiceContainer>,
	safe_to_call_owner: Cell<bool>,
}

pub(crate) struct ContainerCore {
	host: Weak<HostInner>,
	kind: ContainerKind,
	sites: RefCell<IndexMap<ComponentHandle, Site>>,
}

/// An ordered set of sited components, either the host's own or one nested
/// under an owning component.
///
/// Cloning the container creates another reference to the same container.
#[derive( Clone )]
pub struct Container( Rc<ContainerCore> );

impl Container {

	pub(crate) fn new_host( host: Weak<HostInner> ) -> Self {
		Self( Rc::new( ContainerCore { host, kind: ContainerKind::Host, sites: RefCell::default() }))
	}

	pub(crate) fn new_nested( host: &DesignerHost, owner: ComponentHandle, name: Option<String> ) -> Self {
		Self( Rc::new( ContainerCore {
			host: host.downgrade(),
			kind: ContainerKind::Nested( NestedScope {
				owner,
				name,
				services: OnceCell::new(),
				safe_to_call_owner: Cell::new( true ),
			}),
			sites: RefCell::default(),
		}))
	}

	pub(crate) fn from_core( core: Rc<ContainerCore> ) -> Self { Self( core ) }

	pub(crate) fn downgrade( &self ) -> Weak<ContainerCore> { Rc::downgrade( &self.0 ) }

	/// The host this container belongs to, while it is alive.
	pub fn host( &self ) -> Option<DesignerHost> { self.0.host.upgrade().map( DesignerHost::from_inner ) }

	fn require_host( &self ) -> Result<DesignerHost, DesignerError> { self.host().ok_or( DesignerError::Disposed ) }

	/// Adds `component` under `name`, or under a fabricated name when `None`.
	///
	/// Adding a component that is already a member only renames it. A component
	/// sited in another container of the same host is moved here.
	///
	/// # Errors
	/// Any failure of the add protocol; see [`DesignerHost::add`].
	pub fn add( &self, component: ComponentHandle, name: Option<&str> ) -> Result<(), DesignerError> {
		self.require_host()?.add_to_container( self, component, name )
	}

	/// Removes `component` if it is a member; otherwise does nothing.
	///
	/// # Errors
	/// Errors raised by designers being disposed or by removal handlers.
	pub fn remove( &self, component: &ComponentHandle ) -> Result<(), DesignerError> {
		self.require_host()?.remove_from_container( self, component )
	}

	/// Members in the order they were added.
	pub fn components( &self ) -> Vec<ComponentHandle> {
		self.0.sites.borrow().keys().cloned().collect()
	}

	/// The member named `name`, ignoring case.
	pub fn component( &self, name: &str ) -> Option<ComponentHandle> {
		self.0.sites.borrow().iter()
			.find(|( _, site )| names_match( &site.name(), name ))
			.map(|( component, _ )| component.clone() )
	}

	/// The site of a member.
	pub fn site( &self, component: &ComponentHandle ) -> Option<Site> {
		self.0.sites.borrow().get( component ).cloned()
	}

	#[inline] pub fn contains( &self, component: &ComponentHandle ) -> bool { self.0.sites.borrow().contains_key( component ) }
	#[inline] pub fn len( &self ) -> usize { self.0.sites.borrow().len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.0.sites.borrow().is_empty() }

	/// Whether this container is nested under a component.
	#[inline] pub fn is_nested( &self ) -> bool { matches!( self.0.kind, ContainerKind::Nested( _ )) }

	/// The component owning this nested container.
	pub fn owner( &self ) -> Option<ComponentHandle> {
		match &self.0.kind {
			ContainerKind::Host => None,
			ContainerKind::Nested( scope ) => Some( scope.owner.clone() ),
		}
	}

	/// Prefix qualifying the names of this container's members: the owner's
	/// full name followed by the container's own name, if it has one.
	/// `None` for the host's root container.
	pub fn owner_name( &self ) -> Option<String> {
		let ContainerKind::Nested( scope ) = &self.0.kind else { return None };
		let owner = self.host()
			.and_then(| host | host.site( &scope.owner ))
			.map(| site | site.full_name() )
			.unwrap_or_default();
		Some( match scope.name.as_deref() {
			Some( name ) => format!( "{}.{}", owner, name ),
			None => owner,
		})
	}

	/// Services registered directly on a nested container, created on first use.
	/// `None` for the host's root container, whose services live on the host.
	pub fn local_services( &self ) -> Option<&ServiceContainer> {
		match &self.0.kind {
			ContainerKind::Host => None,
			ContainerKind::Nested( scope ) => Some( scope.services.get_or_init( ServiceContainer::new )),
		}
	}

	/// Creates the site for a component that passed the add pre-processing.
	pub(crate) fn site_component(
		&self,
		host: &DesignerHost,
		component: &ComponentHandle,
		name: Option<&str>,
	) -> Result<(), DesignerError> {

		if let Some( other ) = host.site( component ).and_then(| site | site.container() ) {
			if other != *self { other.remove( component )? }
		}

		let name = host.take_pending_name().or_else(|| name.map( str::to_string ));
		let service = host.name_creation_service( self );
		let name = match ( name, service ) {
			( None, Some( service )) => service.create_name( self, component.component_type() ),
			( None, None ) => String::new(),
			( Some( name ), Some( service )) => { service.validate_name( &name )?; name }
			( Some( name ), None ) => name,
		};
		self.validate_unique( component, &name )?;

		let site = Site::new( component.clone(), self, host, name );
		self.0.sites.borrow_mut().insert( component.clone(), site.clone() );
		host.index_site( component.clone(), site );
		Ok(())

	}

	fn validate_unique( &self, component: &ComponentHandle, name: &str ) -> Result<(), DesignerError> {
		if name.is_empty() { return Ok(()) }
		let clash = self.0.sites.borrow().iter().any(|( other, site )|
			other != component
			&& names_match( &site.name(), name )
			&& other.component().inheritance_level() != InheritanceLevel::InheritedReadOnly
		);
		match clash {
			true => Err( DesignerError::DuplicateName( name.to_string() )),
			false => Ok(()),
		}
	}

	/// Takes a member out without unsiting it; the host unsites it once the
	/// removal has been announced.
	pub(crate) fn detach( &self, component: &ComponentHandle ) -> Option<Site> {
		self.0.sites.borrow_mut().shift_remove( component )
	}

	pub(crate) fn first( &self ) -> Option<ComponentHandle> {
		self.0.sites.borrow().first().map(|( component, _ )| component.clone() )
	}

	/// Removes and disposes every member, as happens when the owner leaves the host.
	pub(crate) fn dispose( &self ) -> Vec<DesignerError> {
		let mut errors = Vec::new();
		while let Some( component ) = self.first() {
			let ( removed, nested_failures ) = match self.require_host() {
				Ok( host ) => host.remove_with_nested( self, &component ),
				Err( error ) => ( Err( error ), Vec::new() ),
			};
			errors.extend( nested_failures );
			if let Err( error ) = removed {
				warn!( component = ?component, %error, "failed to remove nested component" );
				errors.push( error );
			}
			if self.contains( &component ) {
				self.detach( &component );
				if let Some( host ) = self.host() { host.unindex_site( &component ) }
			}
			if let Err( error ) = component.component().dispose() {
				warn!( component = ?component, %error, "failed to dispose nested component" );
				errors.push( error );
			}
		}
		errors
	}

}

impl ServiceProvider for Container {
	fn service_entry( &self, service: TypeId ) -> Option<Rc<dyn Any>> {
		match &self.0.kind {
			ContainerKind::Host => self.host()?.service_entry( service ),
			ContainerKind::Nested( scope ) => {
				if let Some( entry ) = scope.services.get().and_then(| local | local.service_entry( service )) {
					return Some( entry )
				}
				// The owner's site may route back through this container.
				if !scope.safe_to_call_owner.replace( false ) { return None }
				let entry = self.host()
					.and_then(| host | host.site( &scope.owner ))
					.and_then(| site | site.service_entry( service ));
				scope.safe_to_call_owner.set( true );
				entry
			}
		}
	}
}

impl PartialEq for Container {
	fn eq( &self, other: &Self ) -> bool { Rc::ptr_eq( &self.0, &other.0 ) }
}
impl Eq for Container {}

impl std::fmt::Debug for Container {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Container" )
			.field( "owner", &self.owner() )
			.field( "components", &self.len() )
			.finish()
	}
}
