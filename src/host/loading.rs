//! The load lifecycle of a [`DesignerHost`].
//!
//! ```text
//! begin_load ─▶ Loading ─▶ end_load ─┬─▶ loaded (LoadComplete, selection restored)
//!                                    └─▶ unload ─▶ empty
//! reload = flush + snapshot selection + unload + begin_load
//! ```
//!
//! Unloading never stops half way. Every designer and component is released
//! even if some of them fail; the failures are reported together once the
//! host is empty.

use std::rc::Rc ;
use itertools::Itertools ;
use pipe_trait::Pipe ;
use tracing::{ debug, warn };

use crate::{
	ComponentHandle, DesignerError, DesignerEventService, DesignerLoader, ExtenderProviderService,
	ExtenderSource, HelpKeywordType, HelpService, SelectionService, ServiceProviderExt, UnloadErrors,
};
use crate::events::ActiveDesignerChanged ;
use super::{ DesignerHost, HostState };



/// Name of the help context attribute carrying the root designer's keyword.
const HELP_KEYWORD_ATTRIBUTE: &str = "Keyword" ;

impl DesignerHost {

	/// Starts loading the design through `loader` and binds the loader to the host.
	///
	/// The loader populates the host and calls [`end_load`]( Self::end_load ) when
	/// it is done. A failure of the loader itself is not returned: it is fed to
	/// `end_load` as a failed load, which unloads the host.
	///
	/// # Errors
	/// - [`DesignerError::LoaderAlreadySpecified`] if a different loader is bound.
	/// - [`DesignerError::Disposed`] after [`dispose_host`]( Self::dispose_host ).
	/// - Errors from the `end_load` a failing loader triggers, and from `Activated` handlers.
	pub fn begin_load( &self, loader: Rc<dyn DesignerLoader> ) -> Result<(), DesignerError> {

		let surface = self.surface()?;
		let bound = self.loader();
		match bound {
			Some( bound ) if !Rc::ptr_eq( &bound, &loader ) => return Err( DesignerError::LoaderAlreadySpecified ),
			Some( _ ) => {}
			None => self.bind_loader( &loader ),
		}

		self.insert_state( HostState::LOADING );
		debug!( "loading design" );
		surface.on_loading();

		if let Err( error ) = loader.begin_load( self ) {
			warn!( %error, "designer loader failed" );
			self.end_load( None, false, vec![ describe_loader_failure( error )])?;
		}

		let subscribed = self.0.designer_event_subscription.borrow().is_some();
		if !subscribed {
			self.on_active_designer_changed( &ActiveDesignerChanged { old_designer: None, new_designer: Some( self.clone() )})?;
		}

		Ok(())

	}

	fn bind_loader( &self, loader: &Rc<dyn DesignerLoader> ) {

		self.0.loader.replace( Some( Rc::clone( loader )));

		if loader.as_extender_provider().is_some() {
			if let Some( service ) = self.get_service::<dyn ExtenderProviderService>() {
				service.add_extender_provider( ExtenderSource::Loader( Rc::clone( loader )));
			}
		}

		let Some( service ) = self.get_service::<dyn DesignerEventService>() else { return };
		let host = self.downgrade();
		let id = service.subscribe_active_designer_changed( Rc::new( move | args | {
			let Some( host ) = host.upgrade().map( DesignerHost::from_inner ) else { return };
			if let Err( error ) = host.on_active_designer_changed( args ) {
				warn!( %error, "failed to handle active designer change" );
			}
		}));
		self.0.designer_event_subscription.replace( Some(( service, id )));

	}

	fn on_active_designer_changed( &self, args: &ActiveDesignerChanged ) -> Result<(), DesignerError> {
		if args.old_designer.as_ref() == Some( self ) {
			self.surface()?.flush( self )?;
			self.0.events.deactivated.raise( self, &() )?;
		}
		if args.new_designer.as_ref() == Some( self ) {
			self.0.events.activated.raise( self, &() )?;
		}
		Ok(())
	}

	/// Asks the surface to bring this host's view to the front.
	///
	/// # Errors
	/// [`DesignerError::Disposed`] after [`dispose_host`]( Self::dispose_host ).
	pub fn activate( &self ) -> Result<(), DesignerError> {
		self.surface()?.on_view_activate();
		Ok(())
	}

	/// Completes a load started by [`begin_load`]( Self::begin_load ).
	///
	/// `root_class_name` names the designed class; when `None` the root
	/// component's name is used. A load claimed successful that produced no root
	/// component fails with [`DesignerError::NoBaseClass`]. A failed load is
	/// unloaded before the surface is told about it.
	///
	/// # Errors
	/// - [`DesignerError::Unload`] if unloading a failed load was lossy.
	/// - The error of a failing `LoadComplete` handler. The load is then
	/// 	treated as failed: the host unloads and reports the failure to the surface.
	pub fn end_load( &self, root_class_name: Option<&str>, successful: bool, errors: Vec<DesignerError> ) -> Result<(), DesignerError> {

		let was_loading = self.state().contains( HostState::LOADING );
		self.remove_state( HostState::LOADING );

		let class_name = match root_class_name {
			Some( class_name ) => Some( class_name.to_string() ),
			None => self.root_component()
				.and_then(| root | self.site( &root ))
				.map(| site | site.name() ),
		};
		if let Some( class_name ) = class_name { self.0.root_component_class_name.replace( Some( class_name )); }

		let mut errors = errors ;
		let successful = match successful && self.root_component().is_none() {
			true => { errors.push( DesignerError::NoBaseClass ); false }
			false => successful,
		};

		let unloaded = match successful {
			true => Ok(()),
			false => self.unload(),
		};

		let surface = self.surface()?;
		if was_loading { surface.on_loaded( successful, &errors ) }
		debug!( successful, errors = errors.len(), "design loaded" );

		if successful {
			if was_loading {
				self.publish_help_keyword();
				if let Err( error ) = self.0.events.load_complete.raise( self, &() ) {
					warn!( %error, "load completion handler failed, unloading" );
					self.insert_state( HostState::LOADING );
					let unloaded = self.unload();
					self.remove_state( HostState::LOADING );
					let failures = std::iter::once( error.clone() )
						.chain( errors )
						.chain( unloaded.err() )
						.collect_vec();
					surface.on_loaded( false, &failures );
					return Err( error )
				}
			}
			self.restore_selection();
		}

		unloaded

	}

	/// Releases every designer and component and empties the host.
	///
	/// Non-root components go first and the root component last. The teardown
	/// runs inside one transaction and continues past failing designers and
	/// components.
	///
	/// # Errors
	/// - [`DesignerError::Unload`] listing every failure. The host is empty regardless.
	/// - [`DesignerError::Disposed`] after [`dispose_host`]( Self::dispose_host ).
	pub fn unload( &self ) -> Result<(), DesignerError> {

		let surface = self.surface()?;
		surface.on_unloading();
		self.withdraw_help_keyword();
		if let Some( selection ) = self.get_service::<dyn SelectionService>() {
			selection.set_selected_components( Vec::new() );
		}

		self.insert_state( HostState::UNLOADING );
		let mut errors = Vec::new();
		let transaction = match self.create_transaction( Some( "Unload" )) {
			Ok( transaction ) => Some( transaction ),
			Err( error ) => { errors.push( error ); None }
		};

		let root = self.root_component();
		let ( roots, children ): ( Vec<_>, Vec<_> ) = self.components().into_iter()
			.partition(| component | root.as_ref() == Some( component ));
		children.iter()
			.chain( roots.iter() )
			.for_each(| component | self.release( component, &mut errors ));

		// Designers of components in nested containers.
		let remaining = self.0.designers.borrow_mut().drain( .. ).collect_vec();
		for ( component, designer ) in remaining {
			if let Err( error ) = designer.designer().dispose() {
				warn!( component = ?component, %error, "designer failed to dispose during unload" );
				errors.push( error );
			}
		}

		while let Some( component ) = self.0.container.first() {
			let ( removed, nested_failures ) = self.remove_with_nested( &self.0.container, &component );
			errors.extend( nested_failures );
			if let Err( error ) = removed {
				warn!( component = ?component, %error, "failed to remove component during unload" );
				errors.push( error );
			}
			if self.0.container.contains( &component ) {
				if let Some( site ) = self.0.container.detach( &component ) { site.mark_disposed() }
				self.unindex_site( &component );
			}
		}
		self.0.root_component.replace( None );
		self.0.root_component_class_name.replace( None );

		if let Some( transaction ) = &transaction {
			if let Err( error ) = transaction.commit() { errors.push( error ) }
		}
		self.remove_state( HostState::UNLOADING );
		self.commit_leftover_transactions();
		drop( transaction );

		surface.on_unloaded();
		debug!( errors = errors.len(), "design unloaded" );

		match UnloadErrors::from_vec( errors ) {
			Some( errors ) => Err( DesignerError::Unload( errors )),
			None => Ok(()),
		}

	}

	fn release( &self, component: &ComponentHandle, errors: &mut Vec<DesignerError> ) {
		let designer = self.0.designers.borrow_mut().shift_remove( component );
		if let Some( designer ) = designer {
			if let Err( error ) = designer.designer().dispose() {
				warn!( component = ?component, %error, "designer failed to dispose during unload" );
				errors.push( error );
			}
		}
		if let Err( error ) = component.component().dispose() {
			warn!( component = ?component, %error, "component failed to dispose during unload" );
			errors.push( error );
		}
	}

	/// Transactions still open after an unload are committed innermost first.
	fn commit_leftover_transactions( &self ) {
		while let Some( transaction ) = self.innermost_transaction() {
			warn!( description = transaction.description(), "committing transaction left open by unload" );
			if let Err( error ) = transaction.close( true ) {
				warn!( description = transaction.description(), %error, "failed to commit leftover transaction" );
			}
			let stuck = self.innermost_transaction().is_some_and(| innermost | Rc::ptr_eq( &innermost, &transaction ));
			if stuck { self.discard_transaction( &transaction ) }
		}
	}

	/// Unloads and loads the design again through the bound loader, keeping
	/// the selection by component name. Does nothing without a loader.
	///
	/// # Errors
	/// - Errors from flushing the loader.
	/// - [`DesignerError::Unload`] if the unload was lossy, unless
	/// 	[`ignore_errors_during_reload`]( Self::ignore_errors_during_reload ) is set.
	/// - Any error of [`begin_load`]( Self::begin_load ).
	pub fn reload( &self ) -> Result<(), DesignerError> {

		let Some( loader ) = self.loader() else { return Ok(()) };
		debug!( "reloading design" );

		self.surface()?.flush( self )?;

		if let Some( selection ) = self.get_service::<dyn SelectionService>() {
			let names = selection.selected_components().iter()
				.filter_map(| component | self.site( component ))
				.map(| site | site.name() )
				.filter(| name | !name.is_empty() )
				.collect_vec();
			self.0.saved_selection.replace( Some( names ));
		}

		match self.unload() {
			Err( error ) if self.ignore_errors_during_reload() => warn!( %error, "ignoring unload errors during reload" ),
			Err( error ) => {
				// The snapshot only survives into the load this reload starts.
				self.0.saved_selection.replace( None );
				return Err( error )
			}
			Ok(()) => {}
		}

		self.begin_load( loader )

	}

	/// Tears the host down for good and detaches it from its surface.
	///
	/// A bound loader is disposed and the design unloaded. Components left in
	/// the host are released without notifications. Afterwards every operation
	/// that needs the surface fails with [`DesignerError::Disposed`].
	///
	/// # Errors
	/// [`DesignerError::Unload`] listing every failure; the host is disposed regardless.
	pub fn dispose_host( &self ) -> Result<(), DesignerError> {

		let mut errors = Vec::new();

		let loader = self.0.loader.take();
		if let Some( loader ) = loader {
			loader.dispose();
			match self.unload() {
				Err( DesignerError::Unload( unload_errors )) => errors.extend( unload_errors.iter().cloned() ),
				Err( error ) => errors.push( error ),
				Ok(()) => {}
			}
			if loader.as_extender_provider().is_some() {
				if let Some( service ) = self.get_service::<dyn ExtenderProviderService>() {
					service.remove_extender_provider( &ExtenderSource::Loader( loader ));
				}
			}
		}

		let subscription = self.0.designer_event_subscription.take();
		if let Some(( service, id )) = subscription { service.unsubscribe_active_designer_changed( id ) }

		let remaining = self.components();
		for component in remaining.iter().rev() {
			self.release( component, &mut errors );
			if let Some( site ) = self.0.container.detach( component ) {
				site.mark_disposed();
				site.take_nested_containers().iter().for_each(| nested | errors.extend( nested.dispose() ));
			}
			self.unindex_site( component );
		}
		self.0.root_component.replace( None );
		self.0.root_component_class_name.replace( None );

		self.0.surface.replace( None );
		self.0.events.clear();
		debug!( errors = errors.len(), "designer host disposed" );

		match UnloadErrors::from_vec( errors ) {
			Some( errors ) => Err( DesignerError::Unload( errors )),
			None => Ok(()),
		}

	}

	fn publish_help_keyword( &self ) {
		let Some( help ) = self.get_service::<dyn HelpService>() else { return };
		let Some( designer ) = self.root_component().and_then(| root | self.designer( &root )) else { return };
		help.add_context_attribute( HELP_KEYWORD_ATTRIBUTE, &designer.help_keyword(), HelpKeywordType::F1Keyword );
	}

	fn withdraw_help_keyword( &self ) {
		let Some( help ) = self.get_service::<dyn HelpService>() else { return };
		let Some( designer ) = self.root_component().and_then(| root | self.designer( &root )) else { return };
		help.remove_context_attribute( HELP_KEYWORD_ATTRIBUTE, &designer.help_keyword() );
	}

	fn restore_selection( &self ) {
		let Some( names ) = self.0.saved_selection.take() else { return };
		let Some( selection ) = self.get_service::<dyn SelectionService>() else { return };
		names.iter()
			.filter_map(| name | self.component( name ))
			.collect_vec()
			.pipe(| components | selection.set_selected_components( components ));
	}

}

/// Loader errors must carry a message the surface can show.
fn describe_loader_failure( error: DesignerError ) -> DesignerError {
	if let DesignerError::External( inner ) = &error {
		if inner.to_string().trim().is_empty() {
			return DesignerError::LoaderFailure( "the loader raised an error without a message".to_string() )
		}
	}
	error
}
