//! Service location and the collaborator services the host consults.
//!
//! Services are registered and resolved by type. A service is usually a trait
//! object, so it is stored as `Rc<S>` for `S: ?Sized`:
//!
//! ```
//! use std::rc::Rc ;
//! use design_host::{ ServiceContainer, ServiceProviderExt, SelectionService, ComponentHandle };
//! # use std::cell::RefCell ;
//! # #[derive( Default )] struct Selection( RefCell<Vec<ComponentHandle>> );
//! # impl SelectionService for Selection {
//! # 	fn selected_components( &self ) -> Vec<ComponentHandle> { self.0.borrow().clone() }
//! # 	fn set_selected_components( &self, components: Vec<ComponentHandle> ) { *self.0.borrow_mut() = components }
//! # }
//!
//! let services = ServiceContainer::new();
//! services.add_service::<dyn SelectionService>( Rc::new( Selection::default() ));
//! assert!( services.get_service::<dyn SelectionService>().is_some() );
//! ```

use std::any::{ Any, TypeId };
use std::cell::RefCell ;
use std::collections::HashMap ;
use std::rc::Rc ;

use crate::{ ComponentHandle, Container, DesignerError, DesignerHandle, DesignerLoader, ExtenderProvider };
use crate::events::{ ActiveDesignerChanged, HandlerId };



/// Something services can be resolved from.
///
/// Implementors only deal in type-erased entries; use [`ServiceProviderExt`]
/// for typed access.
pub trait ServiceProvider {
	/// Returns the entry registered under `service`, which holds an `Rc<S>`
	/// where `TypeId::of::<Rc<S>>() == service`.
	fn service_entry( &self, service: TypeId ) -> Option<Rc<dyn Any>> ;
}

/// Typed access to a [`ServiceProvider`].
pub trait ServiceProviderExt: ServiceProvider {
	/// Resolves the service registered as `S`.
	fn get_service<S: ?Sized + 'static>( &self ) -> Option<Rc<S>> {
		self.service_entry( TypeId::of::<Rc<S>>() )?
			.downcast_ref::<Rc<S>>()
			.cloned()
	}
}

impl<T: ServiceProvider + ?Sized> ServiceProviderExt for T {}

/// A flat table of services keyed by type.
#[derive( Default )]
pub struct ServiceContainer {
	entries: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl ServiceContainer {

	pub fn new() -> Self { Self::default() }

	/// Registers `service` as `S`, replacing any previous registration.
	pub fn add_service<S: ?Sized + 'static>( &self, service: Rc<S> ) {
		self.entries.borrow_mut().insert( TypeId::of::<Rc<S>>(), Rc::new( service ));
	}

	/// Removes the service registered as `S`.
	pub fn remove_service<S: ?Sized + 'static>( &self ) -> bool {
		self.entries.borrow_mut().remove( &TypeId::of::<Rc<S>>() ).is_some()
	}

	pub fn contains<S: ?Sized + 'static>( &self ) -> bool {
		self.entries.borrow().contains_key( &TypeId::of::<Rc<S>>() )
	}

}

impl ServiceProvider for ServiceContainer {
	fn service_entry( &self, service: TypeId ) -> Option<Rc<dyn Any>> {
		self.entries.borrow().get( &service ).cloned()
	}
}

impl std::fmt::Debug for ServiceContainer {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ServiceContainer" )
			.field( "services", &self.entries.borrow().len() )
			.finish()
	}
}

/// The object that registered itself as an extender provider.
///
/// Components, designers and loaders may all provide extenders. The source is
/// kept as a handle so the service can unregister it by identity later.
#[derive( Clone )]
pub enum ExtenderSource {
	Component( ComponentHandle ),
	Designer( DesignerHandle ),
	Loader( Rc<dyn DesignerLoader> ),
}

impl ExtenderSource {

	/// The extender capability of the underlying object, if it still offers one.
	pub fn provider( &self ) -> Option<&dyn ExtenderProvider> {
		match self {
			Self::Component( component ) => component.component().as_extender_provider(),
			Self::Designer( designer ) => designer.designer().as_extender_provider(),
			Self::Loader( loader ) => loader.as_extender_provider(),
		}
	}

	/// Whether the provider offers properties for `target`.
	pub fn can_extend( &self, target: &ComponentHandle ) -> bool {
		self.provider().is_some_and(| provider | provider.can_extend( target ))
	}

}

impl PartialEq for ExtenderSource {
	fn eq( &self, other: &Self ) -> bool {
		match ( self, other ) {
			( Self::Component( a ), Self::Component( b )) => a == b,
			( Self::Designer( a ), Self::Designer( b )) => a == b,
			( Self::Loader( a ), Self::Loader( b )) => Rc::as_ptr( a ).cast::<()>() == Rc::as_ptr( b ).cast::<()>(),
			_ => false,
		}
	}
}

impl std::fmt::Debug for ExtenderSource {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Component( component ) => f.debug_tuple( "Component" ).field( component ).finish(),
			Self::Designer( designer ) => f.debug_tuple( "Designer" ).field( designer ).finish(),
			Self::Loader( _ ) => f.debug_tuple( "Loader" ).field( &"<loader>" ).finish(),
		}
	}
}

/// Keeps the set of active extender providers.
pub trait ExtenderProviderService {
	fn add_extender_provider( &self, provider: ExtenderSource );
	fn remove_extender_provider( &self, provider: &ExtenderSource );
}

/// Fabricates and validates component names.
pub trait NameCreationService {

	/// Creates a name for a component of `component_type` that is unique in `container`.
	fn create_name( &self, container: &Container, component_type: &str ) -> String ;

	/// Checks `name` is acceptable as a component name.
	///
	/// # Errors
	/// Returns [`DesignerError::InvalidName`] describing why the name was rejected.
	fn validate_name( &self, name: &str ) -> Result<(), DesignerError> ;

	fn is_valid_name( &self, name: &str ) -> bool { self.validate_name( name ).is_ok() }

}

/// Tracks the components currently selected on the design surface.
pub trait SelectionService {
	fn selected_components( &self ) -> Vec<ComponentHandle> ;
	/// Replaces the selection.
	fn set_selected_components( &self, components: Vec<ComponentHandle> );
}

/// Kind of keyword published through the [`HelpService`].
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub enum HelpKeywordType {
	F1Keyword,
	GeneralKeyword,
	FilterKeyword,
}

/// Context-sensitive help attributes.
pub trait HelpService {
	fn add_context_attribute( &self, name: &str, value: &str, keyword_type: HelpKeywordType );
	fn remove_context_attribute( &self, name: &str, value: &str );
}

/// Tracks which designer host is active when several are open.
pub trait DesignerEventService {
	/// Subscribes to active-designer changes.
	fn subscribe_active_designer_changed( &self, handler: Rc<dyn Fn( &ActiveDesignerChanged )> ) -> HandlerId ;
	fn unsubscribe_active_designer_changed( &self, id: HandlerId );
}

/// Name creation used when no [`NameCreationService`] is available.
///
/// Names are the lower-camel-cased short type name followed by the first
/// number not taken in the container: `button1`, `button2`, ...
#[derive( Debug, Default, Clone, Copy )]
pub struct DefaultNameCreationService ;

impl NameCreationService for DefaultNameCreationService {

	fn create_name( &self, container: &Container, component_type: &str ) -> String {
		let short = component_type.rsplit( '.' ).next().unwrap_or( component_type );
		let mut chars = short.chars();
		let base = match chars.next() {
			Some( first ) => first.to_lowercase().chain( chars ).collect::<String>(),
			None => "component".to_string(),
		};
		( 1_usize.. )
			.map(| index | format!( "{}{}", base, index ))
			.find(| name | container.component( name ).is_none() )
			.unwrap_or_else(|| base.clone() )
	}

	fn validate_name( &self, name: &str ) -> Result<(), DesignerError> {
		let invalid = | reason: &str | -> Result<(), DesignerError> {
			Err( DesignerError::InvalidName { name: name.to_string(), reason: reason.to_string() })
		};
		let mut chars = name.chars();
		match chars.next() {
			None => invalid( "name is empty" ),
			Some( first ) if !( first.is_alphabetic() || first == '_' ) => invalid( "name must start with a letter or an underscore" ),
			Some( _ ) if chars.any(| c | !( c.is_alphanumeric() || c == '_' )) => invalid( "name may only contain letters, digits and underscores" ),
			Some( _ ) => Ok(()),
		}
	}

}
