//! The designer host: the root container of a design surface.
//!
//! A [`DesignerHost`] mediates every addition and removal of components,
//! binds each component to a designer, keeps the transaction stack and drives
//! the load lifecycle (see [`begin_load`]( DesignerHost::begin_load )).
//!
//! Adding and removing are split in two phases around the actual container
//! mutation. Pre-processing validates the request and raises the "-ing"
//! notification; post-processing creates or releases the designer and raises
//! the "-ed" notification. A failure during post-processing of an add rolls the
//! component back out of its container.

mod loading ;

use std::any::{ Any, TypeId };
use std::cell::{ Cell, RefCell };
use std::collections::HashMap ;
use std::rc::{ Rc, Weak };
use bitflags::bitflags ;
use indexmap::IndexMap ;
use tracing::{ trace, warn };

use crate::{
	ComponentHandle, ComponentType, Container, DefaultNameCreationService, DesignerError,
	DesignerEventService, DesignerHandle, DesignerLoader, DesignerTransaction, ExtenderProviderService,
	ExtenderSource, InheritanceLevel, LicenseContext, NameCreationService, ServiceContainer,
	ServiceProvider, ServiceProviderExt, Site, Surface,
};
use crate::events::{ ComponentChanged, ComponentChanging, ComponentEvent, ComponentRename, HandlerId, HostEvents };
use crate::license::LicenseScope ;
use crate::transaction::TransactionInner ;



bitflags! {
	/// Lifecycle flags of a host.
	#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
	pub(crate) struct HostState: u8 {
		const LOADING = 1 ;
		const UNLOADING = 1 << 1 ;
		const CLOSING_TRANSACTION = 1 << 2 ;
	}
}

const DEFAULT_TRANSACTION_DESCRIPTION: &str = "Untitled transaction" ;

pub(crate) struct HostInner {
	surface: RefCell<Option<Rc<dyn Surface>>>,
	loader: RefCell<Option<Rc<dyn DesignerLoader>>>,
	container: Container,
	/// Every site in the host, including those of nested containers.
	sites: RefCell<HashMap<ComponentHandle, Site>>,
	designers: RefCell<IndexMap<ComponentHandle, DesignerHandle>>,
	root_component: RefCell<Option<ComponentHandle>>,
	root_component_class_name: RefCell<Option<String>>,
	transactions: RefCell<Option<Vec<Rc<TransactionInner>>>>,
	state: Cell<HostState>,
	saved_selection: RefCell<Option<Vec<String>>>,
	pending_name: RefCell<Option<String>>,
	license_context: LicenseContext,
	creating_component: Cell<bool>,
	services: ServiceContainer,
	default_name_creation: Option<Rc<dyn NameCreationService>>,
	events: HostEvents,
	designer_event_subscription: RefCell<Option<( Rc<dyn DesignerEventService>, HandlerId )>>,
	ignore_errors_during_reload: Cell<bool>,
	can_reload_with_errors: Cell<bool>,
}

/// Configures a [`DesignerHost`] before it is built.
///
/// ```
/// # use std::rc::Rc ;
/// # use design_host::*;
/// # struct Surface ;
/// # impl ServiceProvider for Surface {
/// # 	fn service_entry( &self, _: std::any::TypeId ) -> Option<Rc<dyn std::any::Any>> { None }
/// # }
/// # impl design_host::Surface for Surface {
/// # 	fn create_designer( &self, _: &DesignerHost, _: &ComponentHandle, _: bool ) -> Result<Option<DesignerHandle>, DesignerError> { Ok( None ) }
/// # 	fn create_instance( &self, _: &DesignerHost, _: &ComponentType, _: &LicenseContext ) -> Result<Option<ComponentHandle>, DesignerError> { Ok( None ) }
/// # }
/// let host = DesignerHost::builder( Rc::new( Surface ))
/// 	.with_license_context( LicenseContext::with_usage_mode( LicenseUsageMode::Runtime ))
/// 	.with_service::<dyn NameCreationService>( Rc::new( DefaultNameCreationService ))
/// 	.can_reload_with_errors( true )
/// 	.build();
///
/// assert!( host.get_service::<dyn NameCreationService>().is_some() );
/// assert!( host.set_ignore_errors_during_reload( true ));
/// ```
pub struct HostBuilder {
	surface: Rc<dyn Surface>,
	license_context: LicenseContext,
	services: ServiceContainer,
	default_name_creation: bool,
	can_reload_with_errors: bool,
}

impl HostBuilder {

	/// Licensing context handed to the surface whenever a component is created.
	pub fn with_license_context( mut self, license_context: LicenseContext ) -> Self {
		self.license_context = license_context ;
		self
	}

	/// Registers a host-local service, resolved before the surface's services.
	pub fn with_service<S: ?Sized + 'static>( self, service: Rc<S> ) -> Self {
		self.services.add_service( service );
		self
	}

	/// Whether components are named by [`DefaultNameCreationService`] when no
	/// [`NameCreationService`] resolves. On by default; when off, unnamed
	/// components keep an empty name.
	pub fn with_default_name_creation( mut self, enabled: bool ) -> Self {
		self.default_name_creation = enabled ;
		self
	}

	/// Whether the loader may reload a design that failed with errors.
	pub fn can_reload_with_errors( mut self, enabled: bool ) -> Self {
		self.can_reload_with_errors = enabled ;
		self
	}

	pub fn build( self ) -> DesignerHost {
		let default_name_creation = match self.default_name_creation {
			true => Some( Rc::new( DefaultNameCreationService ) as Rc<dyn NameCreationService> ),
			false => None,
		};
		DesignerHost( Rc::new_cyclic(| host | HostInner {
			surface: RefCell::new( Some( self.surface )),
			loader: RefCell::new( None ),
			container: Container::new_host( host.clone() ),
			sites: RefCell::default(),
			designers: RefCell::default(),
			root_component: RefCell::new( None ),
			root_component_class_name: RefCell::new( None ),
			transactions: RefCell::new( None ),
			state: Cell::new( HostState::empty() ),
			saved_selection: RefCell::new( None ),
			pending_name: RefCell::new( None ),
			license_context: self.license_context,
			creating_component: Cell::new( false ),
			services: self.services,
			default_name_creation,
			events: HostEvents::default(),
			designer_event_subscription: RefCell::new( None ),
			ignore_errors_during_reload: Cell::new( false ),
			can_reload_with_errors: Cell::new( self.can_reload_with_errors ),
		}))
	}

}

/// The root container of a design surface.
///
/// `DesignerHost` is a handle type; cloning it creates another reference to
/// the same host. Handles compare equal when they refer to the same host.
///
/// The host is single-threaded and re-entrant: notifications, designer
/// creation and loader calls may call back into any operation of the host.
#[derive( Clone )]
pub struct DesignerHost( Rc<HostInner> );

impl DesignerHost {

	/// Starts configuring a host owned by `surface`.
	pub fn builder( surface: Rc<dyn Surface> ) -> HostBuilder {
		HostBuilder {
			surface,
			license_context: LicenseContext::design_time(),
			services: ServiceContainer::new(),
			default_name_creation: true,
			can_reload_with_errors: false,
		}
	}

	/// A host owned by `surface` with default configuration.
	pub fn new( surface: Rc<dyn Surface> ) -> Self { Self::builder( surface ).build() }

	pub(crate) fn from_inner( inner: Rc<HostInner> ) -> Self { Self( inner ) }

	pub(crate) fn downgrade( &self ) -> Weak<HostInner> { Rc::downgrade( &self.0 ) }

	pub(crate) fn surface( &self ) -> Result<Rc<dyn Surface>, DesignerError> {
		let surface = self.0.surface.borrow().clone();
		surface.ok_or( DesignerError::Disposed )
	}

	/// The host's own container.
	#[inline] pub fn container( &self ) -> &Container { &self.0.container }

	/// Components of the host's own container, in the order they were added.
	pub fn components( &self ) -> Vec<ComponentHandle> { self.0.container.components() }

	/// The component of the host's own container named `name`, ignoring case.
	pub fn component( &self, name: &str ) -> Option<ComponentHandle> { self.0.container.component( name ) }

	/// The site of a component in any container of this host.
	pub fn site( &self, component: &ComponentHandle ) -> Option<Site> {
		self.0.sites.borrow().get( component ).cloned()
	}

	/// The designer bound to `component`.
	pub fn designer( &self, component: &ComponentHandle ) -> Option<DesignerHandle> {
		self.0.designers.borrow().get( component ).cloned()
	}

	/// Every designer, in the order their components were added.
	pub fn designers( &self ) -> Vec<DesignerHandle> {
		self.0.designers.borrow().values().cloned().collect()
	}

	pub fn root_component( &self ) -> Option<ComponentHandle> { self.0.root_component.borrow().clone() }

	/// Fully qualified name of the class being designed.
	pub fn root_component_class_name( &self ) -> Option<String> { self.0.root_component_class_name.borrow().clone() }

	/// Whether the host is loading, or its loader reports it is still loading.
	pub fn loading( &self ) -> bool {
		if self.state().contains( HostState::LOADING ) { return true }
		let loader = self.0.loader.borrow().clone();
		loader.is_some_and(| loader | loader.loading() )
	}

	/// The loader bound by [`begin_load`]( Self::begin_load ).
	pub fn loader( &self ) -> Option<Rc<dyn DesignerLoader>> { self.0.loader.borrow().clone() }

	/// Every notification raised by this host.
	#[inline] pub fn events( &self ) -> &HostEvents { &self.0.events }

	#[inline] pub fn license_context( &self ) -> &LicenseContext { &self.0.license_context }

	/// Registers a host-local service, replacing any previous registration of `S`.
	pub fn add_service<S: ?Sized + 'static>( &self, service: Rc<S> ) { self.0.services.add_service( service ) }

	pub fn remove_service<S: ?Sized + 'static>( &self ) -> bool { self.0.services.remove_service::<S>() }

	/// Adds `component` to the host's own container.
	///
	/// With no `name`, one is fabricated by the [`NameCreationService`]. The
	/// first component added to an empty host becomes the root component.
	///
	/// # Errors
	/// - [`DesignerError::UnloadingInProgress`] while the host is unloading.
	/// - [`DesignerError::CyclicAdd`] for an instance of the class being designed.
	/// - [`DesignerError::DuplicateName`] or [`DesignerError::InvalidName`] for a bad name.
	/// - [`DesignerError::NoTopLevelDesigner`] if the first component gets no root designer.
	/// - [`DesignerError::DesignerNeedsComponent`] if its designer does not bind to it.
	/// - Errors from the surface, the designer or `ComponentAdding`/`ComponentAdded` handlers.
	///
	/// Once the component has been sited, any failure removes it again.
	pub fn add( &self, component: ComponentHandle, name: Option<&str> ) -> Result<(), DesignerError> {
		let container = self.0.container.clone();
		self.add_to_container( &container, component, name )
	}

	/// Removes `component` from the host's own container, releasing its designer.
	/// Does nothing if it is not a member.
	///
	/// # Errors
	/// Errors from disposing the designer or from `ComponentRemoving`/`ComponentRemoved` handlers.
	pub fn remove( &self, component: &ComponentHandle ) -> Result<(), DesignerError> {
		let container = self.0.container.clone();
		self.remove_from_container( &container, component )
	}

	pub(crate) fn add_to_container(
		&self,
		container: &Container,
		component: ComponentHandle,
		name: Option<&str>,
	) -> Result<(), DesignerError> {

		if !self.add_pre_process( container, &component, name )? { return Ok(()) }

		container.site_component( self, &component, name )?;
		trace!( component = ?component, nested = container.is_nested(), "component sited" );

		// Cancellation is rolled back like any other failure.
		if let Err( error ) = self.add_post_process( &component ) {
			if let Err( rollback ) = container.remove( &component ) {
				warn!( component = ?component, error = %rollback, "failed to roll back component" );
			}
			return Err( error )
		}

		Ok(())

	}

	fn add_pre_process(
		&self,
		container: &Container,
		component: &ComponentHandle,
		name: Option<&str>,
	) -> Result<bool, DesignerError> {

		if self.state().contains( HostState::UNLOADING ) { return Err( DesignerError::UnloadingInProgress ) }

		if self.0.root_component.borrow().is_some() {
			let root_class_name = self.root_component_class_name()
				.filter(| class_name | class_name == component.component_type() );
			if let Some( root_class_name ) = root_class_name {
				return Err( DesignerError::CyclicAdd { component_type: component.component_type().to_string(), root_class_name })
			}
		}

		if let Some( site ) = container.site( component ) {
			if name.is_some() { site.set_name( name )? }
			return Ok( false )
		}

		self.0.events.component_adding.raise( self, &ComponentEvent { component: component.clone() })?;
		Ok( true )

	}

	fn add_post_process( &self, component: &ComponentHandle ) -> Result<(), DesignerError> {

		let extenders = self.get_service::<dyn ExtenderProviderService>();
		if component.component().as_extender_provider().is_some()
			&& component.component().inheritance_level() != InheritanceLevel::InheritedReadOnly {
			if let Some( service ) = &extenders { service.add_extender_provider( ExtenderSource::Component( component.clone() )) }
		}

		let surface = self.surface()?;
		let has_root = self.0.root_component.borrow().is_some();
		let designer = match has_root {
			true => surface.create_designer( self, component, false )?,
			false => {
				let designer = surface.create_designer( self, component, true )?
					.filter(| designer | designer.designer().as_root_designer().is_some() )
					.ok_or_else(|| DesignerError::NoTopLevelDesigner { component_type: component.component_type().to_string() })?;
				self.0.root_component.replace( Some( component.clone() ));
				if self.0.root_component_class_name.borrow().is_none() {
					let name = self.site( component ).map(| site | site.name() );
					self.0.root_component_class_name.replace( name );
				}
				Some( designer )
			}
		};

		if let Some( designer ) = designer {
			// Registered first so the designer can find itself while initialising.
			self.0.designers.borrow_mut().insert( component.clone(), designer.clone() );
			let initialized = designer.designer().initialize( self, component )
				.and_then(|()| match designer.designer().component() {
					Some( _ ) => Ok(()),
					None => Err( DesignerError::DesignerNeedsComponent ),
				});
			if let Err( error ) = initialized {
				self.0.designers.borrow_mut().shift_remove( component );
				return Err( error )
			}
			if designer.designer().as_extender_provider().is_some() {
				if let Some( service ) = &extenders { service.add_extender_provider( ExtenderSource::Designer( designer )) }
			}
		}

		self.0.events.component_added.raise( self, &ComponentEvent { component: component.clone() })

	}

	pub(crate) fn remove_from_container( &self, container: &Container, component: &ComponentHandle ) -> Result<(), DesignerError> {
		// Failures are logged by the nested container and do not fail the owner's removal.
		let ( removed, _nested_failures ) = self.remove_with_nested( container, component );
		removed
	}

	/// Removes `component` and disposes the containers nested under it, handing
	/// back their teardown failures next to the outcome of the removal itself.
	pub(crate) fn remove_with_nested(
		&self,
		container: &Container,
		component: &ComponentHandle,
	) -> ( Result<(), DesignerError>, Vec<DesignerError> ) {

		match self.remove_pre_process( container, component ) {
			Ok( true ) => {}
			Ok( false ) => return ( Ok(()), Vec::new() ),
			Err( error ) => return ( Err( error ), Vec::new() ),
		}

		let site = container.detach( component );
		if let Some( site ) = &site { site.mark_disposed() }
		trace!( component = ?component, nested = container.is_nested(), "component unsited" );

		let removed = self.remove_post_process( component );

		let nested_failures = site.map(| site | site.take_nested_containers() )
			.unwrap_or_default()
			.iter()
			.flat_map( Container::dispose )
			.collect();

		( removed, nested_failures )

	}

	fn remove_pre_process( &self, container: &Container, component: &ComponentHandle ) -> Result<bool, DesignerError> {

		match self.site( component ) {
			Some( site ) if site.is_in( container ) => {}
			_ => return Ok( false ),
		}

		self.0.events.component_removing.raise( self, &ComponentEvent { component: component.clone() })?;

		let extenders = self.get_service::<dyn ExtenderProviderService>();
		if component.component().as_extender_provider().is_some() {
			if let Some( service ) = &extenders { service.remove_extender_provider( &ExtenderSource::Component( component.clone() )) }
		}

		let designer = self.0.designers.borrow_mut().shift_remove( component );
		if let Some( designer ) = designer {
			if designer.designer().as_extender_provider().is_some() {
				if let Some( service ) = &extenders { service.remove_extender_provider( &ExtenderSource::Designer( designer.clone() )) }
			}
			designer.designer().dispose()?;
		}

		let is_root = self.0.root_component.borrow().as_ref() == Some( component );
		if is_root {
			self.0.root_component.replace( None );
			self.0.root_component_class_name.replace( None );
		}

		Ok( true )

	}

	fn remove_post_process( &self, component: &ComponentHandle ) -> Result<(), DesignerError> {
		let raised = self.0.events.component_removed.raise( self, &ComponentEvent { component: component.clone() });
		self.unindex_site( component );
		raised
	}

	/// Creates a component of `component_type` through the surface and adds it
	/// to the host under `name`.
	///
	/// A constructor may add the new component itself; the requested name is
	/// then applied to that add instead. Nested calls made while constructing
	/// share the host's [`LicenseContext`].
	///
	/// # Errors
	/// - [`DesignerError::ComponentCreationFailed`] if the surface produces nothing.
	/// - Construction failures and any error of [`add`]( Self::add ).
	pub fn create_component( &self, component_type: &ComponentType, name: Option<&str> ) -> Result<ComponentHandle, DesignerError> {

		let license = LicenseScope::enter( &self.0.creating_component, &self.0.license_context );
		if license.is_outermost() {
			trace!( component_type = %component_type, usage_mode = ?self.0.license_context.usage_mode(), "creating component" );
		}

		let surface = self.surface()?;
		let previous = self.0.pending_name.replace( name.map( str::to_string ));
		let created = surface.create_instance( self, component_type, &self.0.license_context );
		// Our own add passes the name explicitly; an enclosing constructor still
		// expects its pending name once we return.
		self.0.pending_name.replace( None );
		let added = created.and_then(| created | self.add_created( component_type, created, name ));
		self.0.pending_name.replace( previous );
		added

	}

	fn add_created(
		&self,
		component_type: &ComponentType,
		created: Option<ComponentHandle>,
		name: Option<&str>,
	) -> Result<ComponentHandle, DesignerError> {
		let component = created.ok_or_else(|| DesignerError::ComponentCreationFailed {
			component_type: component_type.name().to_string(),
		})?;
		let sited_here = self.site( &component ).is_some_and(| site | site.is_in( &self.0.container ));
		if !sited_here { self.add( component.clone(), name )? }
		Ok( component )
	}

	/// Removes `component` from its container and disposes it.
	///
	/// Outside of a transaction the work is wrapped in one named after the component.
	///
	/// # Errors
	/// - [`DesignerError::CantDestroyInherited`] for read-only components declared by a base class.
	/// - Errors from removing or disposing the component; an implicit
	/// 	transaction is canceled in that case.
	pub fn destroy_component( &self, component: &ComponentHandle ) -> Result<(), DesignerError> {

		let site = self.site( component );
		let name = site.as_ref()
			.map( Site::name )
			.filter(| name | !name.is_empty() )
			.unwrap_or_else(|| component.component_type().to_string() );

		if component.component().inheritance_level() == InheritanceLevel::InheritedReadOnly {
			return Err( DesignerError::CantDestroyInherited { name })
		}

		let destroy = || -> Result<(), DesignerError> {
			match site.as_ref().and_then( Site::container ) {
				Some( container ) => container.remove( component )?,
				None => self.remove( component )?,
			}
			component.component().dispose()
		};

		match self.in_transaction() {
			true => destroy(),
			false => {
				let transaction = self.create_transaction( Some( format!( "Destroy {}", name ).as_str() ))?;
				destroy()?;
				transaction.commit()
			}
		}

	}

	/// Opens a transaction; `None` uses a generic description.
	///
	/// # Errors
	/// Errors from `TransactionOpening`/`TransactionOpened` handlers. The
	/// transaction is then discarded without raising close notifications.
	pub fn create_transaction( &self, description: Option<&str> ) -> Result<DesignerTransaction, DesignerError> {
		DesignerTransaction::open( self, description.unwrap_or( DEFAULT_TRANSACTION_DESCRIPTION ).to_string() )
	}

	/// Whether a transaction is open or in the middle of closing.
	pub fn in_transaction( &self ) -> bool {
		self.has_open_transactions() || self.state().contains( HostState::CLOSING_TRANSACTION )
	}

	/// Whether a transaction is raising its close notifications.
	pub fn is_closing_transaction( &self ) -> bool { self.state().contains( HostState::CLOSING_TRANSACTION ) }

	/// Description of the innermost open transaction.
	pub fn transaction_description( &self ) -> Option<String> {
		self.innermost_transaction().map(| transaction | transaction.description().to_string() )
	}

	/// Announces that a member of `component` is about to change. Suppressed while loading.
	///
	/// # Errors
	/// Errors from `ComponentChanging` handlers.
	pub fn on_component_changing( &self, component: &ComponentHandle, member: Option<&str> ) -> Result<(), DesignerError> {
		if self.loading() { return Ok(()) }
		self.0.events.component_changing.raise( self, &ComponentChanging {
			component: component.clone(),
			member: member.map( str::to_string ),
		})
	}

	/// Announces that a member of `component` changed. Suppressed while loading.
	///
	/// # Errors
	/// Errors from `ComponentChanged` handlers.
	pub fn on_component_changed(
		&self,
		component: &ComponentHandle,
		member: Option<&str>,
		old_value: Option<Rc<dyn Any>>,
		new_value: Option<Rc<dyn Any>>,
	) -> Result<(), DesignerError> {
		if self.loading() { return Ok(()) }
		self.0.events.component_changed.raise( self, &ComponentChanged {
			component: component.clone(),
			member: member.map( str::to_string ),
			old_value,
			new_value,
		})
	}

	pub(crate) fn on_component_rename( &self, component: &ComponentHandle, old_name: String, new_name: String ) -> Result<(), DesignerError> {

		let is_root = self.0.root_component.borrow().as_ref() == Some( component );
		if is_root {
			let class_name = self.root_component_class_name();
			let renamed = match class_name {
				Some( class_name ) => rename_class( &class_name, &old_name, &new_name ),
				None => new_name.clone(),
			};
			self.0.root_component_class_name.replace( Some( renamed ));
		}

		self.0.events.component_rename.raise( self, &ComponentRename { component: component.clone(), old_name, new_name })

	}

	/// Whether errors should be ignored when the design is reloaded.
	pub fn ignore_errors_during_reload( &self ) -> bool { self.0.ignore_errors_during_reload.get() }

	/// Sets [`ignore_errors_during_reload`]( Self::ignore_errors_during_reload ).
	/// Enabling it only takes effect when the host can reload with errors;
	/// returns whether the value was applied.
	pub fn set_ignore_errors_during_reload( &self, ignore: bool ) -> bool {
		if ignore && !self.can_reload_with_errors() { return false }
		self.0.ignore_errors_during_reload.set( ignore );
		true
	}

	pub fn can_reload_with_errors( &self ) -> bool { self.0.can_reload_with_errors.get() }

	pub fn set_can_reload_with_errors( &self, can_reload: bool ) { self.0.can_reload_with_errors.set( can_reload ) }

	pub(crate) fn name_creation_service( &self, provider: &dyn ServiceProvider ) -> Option<Rc<dyn NameCreationService>> {
		provider.get_service::<dyn NameCreationService>()
			.or_else(|| self.0.default_name_creation.clone() )
	}

	pub(crate) fn take_pending_name( &self ) -> Option<String> { self.0.pending_name.take() }

	pub(crate) fn index_site( &self, component: ComponentHandle, site: Site ) {
		self.0.sites.borrow_mut().insert( component, site );
	}

	pub(crate) fn unindex_site( &self, component: &ComponentHandle ) {
		self.0.sites.borrow_mut().remove( component );
	}

	#[inline] pub(crate) fn state( &self ) -> HostState { self.0.state.get() }

	pub(crate) fn insert_state( &self, flags: HostState ) { self.0.state.set( self.state() | flags ) }

	pub(crate) fn remove_state( &self, flags: HostState ) { self.0.state.set( self.state() - flags ) }

	pub(crate) fn push_transaction( &self, transaction: Rc<TransactionInner> ) {
		self.0.transactions.borrow_mut().get_or_insert_with( Vec::new ).push( transaction );
	}

	pub(crate) fn pop_transaction( &self ) -> Option<Rc<TransactionInner>> {
		self.0.transactions.borrow_mut().as_mut().and_then( Vec::pop )
	}

	/// Drops a transaction whose opening failed, wherever it sits in the stack.
	pub(crate) fn discard_transaction( &self, transaction: &Rc<TransactionInner> ) {
		if let Some( stack ) = self.0.transactions.borrow_mut().as_mut() {
			stack.retain(| open | !Rc::ptr_eq( open, transaction ));
		}
	}

	pub(crate) fn innermost_transaction( &self ) -> Option<Rc<TransactionInner>> {
		self.0.transactions.borrow().as_ref().and_then(| stack | stack.last().cloned() )
	}

	pub(crate) fn has_open_transactions( &self ) -> bool {
		self.0.transactions.borrow().as_ref().is_some_and(| stack | !stack.is_empty() )
	}

}

/// Keeps the namespace of a root class name when its short name is renamed:
/// `"MyApp.Form1"` renamed from `"Form1"` to `"Form2"` becomes `"MyApp.Form2"`.
fn rename_class( class_name: &str, old_name: &str, new_name: &str ) -> String {
	match class_name.strip_suffix( old_name ).filter(| prefix | prefix.ends_with( '.' )) {
		Some( namespace ) => format!( "{}{}", namespace, new_name ),
		None => new_name.to_string(),
	}
}

impl ServiceProvider for DesignerHost {
	fn service_entry( &self, service: TypeId ) -> Option<Rc<dyn Any>> {
		if let Some( entry ) = self.0.services.service_entry( service ) { return Some( entry ) }
		let surface = self.0.surface.borrow().clone();
		surface?.service_entry( service )
	}
}

impl PartialEq for DesignerHost {
	fn eq( &self, other: &Self ) -> bool { Rc::ptr_eq( &self.0, &other.0 ) }
}
impl Eq for DesignerHost {}

impl std::fmt::Debug for DesignerHost {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "DesignerHost" )
			.field( "root_component_class_name", &*self.0.root_component_class_name.borrow() )
			.field( "components", &self.0.container.len() )
			.field( "state", &self.0.state.get() )
			.finish_non_exhaustive()
	}
}

#[cfg( test )]
mod tests {

	use super::rename_class ;

	#[test]
	fn rename_class_keeps_namespace() {
		assert_eq!( rename_class( "MyApp.Form1", "Form1", "Form2" ), "MyApp.Form2" );
		assert_eq!( rename_class( "A.B.Form1", "Form1", "Main" ), "A.B.Main" );
	}

	#[test]
	fn rename_class_replaces_bare_or_unrelated_names() {
		assert_eq!( rename_class( "Form1", "Form1", "Form2" ), "Form2" );
		assert_eq!( rename_class( "MyApp.XForm1", "Form1", "Form2" ), "Form2" );
		assert_eq!( rename_class( "MyApp.Other", "Form1", "Form2" ), "Form2" );
	}

}
