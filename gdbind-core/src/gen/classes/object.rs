use crate :: builtin :: * ; use crate :: meta :: { Signature , ToGodot } ; use crate :: obj :: { Gd , Inherits , ObjectArg } ; use crate :: sys ; # [doc = "Engine class `Object`."] # [derive (Debug)] # [repr (C)] pub struct Object { object_ptr : sys :: GDExtensionObjectPtr , } impl Object { pub const NOTIFICATION_POSTINITIALIZE : i64 = 0 ; pub const NOTIFICATION_PREDELETE : i64 = 1 ; # [doc = "Calls `Object::get_class`."] pub fn get_class (& self ,) -> GString { unsafe { Signature :: < () , GString > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Object__get_class , self . object_ptr , () ,) } } # [doc = "Calls `Object::get_instance_id`."] pub fn get_instance_id (& self ,) -> u64 { unsafe { Signature :: < () , u64 > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Object__get_instance_id , self . object_ptr , () ,) } } # [doc = "Calls `Object::has_method`."] pub fn has_method (& self , method : impl Into < GString >) -> bool { unsafe { Signature :: < (GString ,) , bool > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Object__has_method , self . object_ptr , (method . into () ,) ,) } } # [doc = "Calls `Object::call` with additional variant arguments.\n\n# Panics\nIf the call fails; see [`Self::try_call()`] for a non-panicking version."] pub fn call (& mut self , method : impl Into < GString > , varargs : & [Variant]) -> Variant { self . try_call (method , varargs) . unwrap_or_else (| err | panic ! ("{err}")) } # [doc = "Like the panicking version, but returns the failure as [`CallError`](crate::meta::CallError)."] pub fn try_call (& mut self , method : impl Into < GString > , varargs : & [Variant]) -> Result < Variant , crate :: meta :: CallError > { unsafe { Signature :: < (GString ,) , Variant > :: out_class_varcall (crate :: gen :: central :: method_index :: Object__call , self . object_ptr , (method . into () ,) , varargs ,) } } # [doc = "Calls `Object::emit_signal` with additional variant arguments.\n\n# Panics\nIf the call fails; see [`Self::try_emit_signal()`] for a non-panicking version."] pub fn emit_signal (& mut self , signal : impl Into < GString > , varargs : & [Variant]) -> crate :: global :: Error { self . try_emit_signal (signal , varargs) . unwrap_or_else (| err | panic ! ("{err}")) } # [doc = "Like the panicking version, but returns the failure as [`CallError`](crate::meta::CallError)."] pub fn try_emit_signal (& mut self , signal : impl Into < GString > , varargs : & [Variant]) -> Result < crate :: global :: Error , crate :: meta :: CallError > { unsafe { Signature :: < (GString ,) , crate :: global :: Error > :: out_class_varcall (crate :: gen :: central :: method_index :: Object__emit_signal , self . object_ptr , (signal . into () ,) , varargs ,) } } # [doc = "Calls `Object::connect`, with default arguments."] pub fn connect (& mut self , signal : impl Into < GString > , callable : & Callable) -> crate :: global :: Error { self . connect_ex (signal , callable) . done () } # [doc = "Calls `Object::connect`; the returned builder allows overriding default arguments before [`ExConnect::done()`]."] pub fn connect_ex < 'a > (& 'a mut self , signal : impl Into < GString > , callable : & 'a Callable) -> ExConnect < 'a > { ExConnect :: new (self , signal . into () , callable) } fn connect_full (& mut self , signal : GString , callable : & Callable , flags : u32) -> crate :: global :: Error { unsafe { Signature :: < (GString , & Callable , u32 ,) , crate :: global :: Error > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Object__connect , self . object_ptr , (signal , callable , flags ,) ,) } } } # [doc = r" Signals."] impl Object { # [doc = "Connects `callable` to the signal `script_changed`."] pub fn connect_script_changed (& mut self , callable : & Callable) -> crate :: global :: Error { self . connect ("script_changed" , callable) } # [doc = "Emits the signal `script_changed`."] pub fn emit_script_changed (& mut self ,) -> crate :: global :: Error { self . emit_signal ("script_changed" , & []) } } impl crate :: obj :: GodotClass for Object { type Base = crate :: obj :: NoBase ; const CLASS_NAME : & 'static str = "Object" ; fn class_name_c () -> & 'static std :: ffi :: CStr { c"Object" } } unsafe impl crate :: obj :: Bounds for Object { type Memory = crate :: obj :: bounds :: MemManual ; type DynMemory = crate :: obj :: bounds :: MemDynamic ; type Declarer = crate :: obj :: bounds :: DeclEngine ; } impl crate :: obj :: cap :: GodotDefault for Object { } # [doc (hidden)] # [macro_export] macro_rules ! inherit_from_Object__gdbind { ($ Class : ty) => { unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: Object > for $ Class { } } ; } # [doc = "Default-parameter builder for [`Object::connect_ex()`]."] # [must_use] pub struct ExConnect < 'a > { surround_object : & 'a mut Object , signal : GString , callable : & 'a Callable , flags : u32 , } # [allow (clippy :: redundant_field_names , clippy :: needless_update)] impl < 'a > ExConnect < 'a > { fn new (surround_object : & 'a mut Object , signal : GString , callable : & 'a Callable) -> Self { Self { surround_object , signal , callable , flags : 0 as u32 , } } # [doc = "Overrides the default of `flags`."] pub fn flags (self , flags : u32) -> Self { Self { flags : flags , .. self } } # [doc = r" Performs the call."] pub fn done (self) -> crate :: global :: Error { let Self { surround_object , signal , callable , flags } = self ; surround_object . connect_full (signal , callable , flags) } } # [repr (transparent)] # [derive (Copy , Clone , Eq , PartialEq , Ord , PartialOrd , Hash , Default)] pub struct ConnectFlags { ord : u64 , } impl ConnectFlags { # [doc (alias = "CONNECT_DEFERRED")] # [doc = "Engine enumerator name: `CONNECT_DEFERRED`"] pub const DEFERRED : ConnectFlags = ConnectFlags { ord : 1 } ; # [doc (alias = "CONNECT_PERSIST")] # [doc = "Engine enumerator name: `CONNECT_PERSIST`"] pub const PERSIST : ConnectFlags = ConnectFlags { ord : 2 } ; # [doc (alias = "CONNECT_ONE_SHOT")] # [doc = "Engine enumerator name: `CONNECT_ONE_SHOT`"] pub const ONE_SHOT : ConnectFlags = ConnectFlags { ord : 4 } ; } impl std :: fmt :: Debug for ConnectFlags { fn fmt (& self , f : & mut std :: fmt :: Formatter < '_ >) -> std :: fmt :: Result { let set_flags : Vec < & str > = [("DEFERRED" , Self :: DEFERRED) , ("PERSIST" , Self :: PERSIST) , ("ONE_SHOT" , Self :: ONE_SHOT)] . into_iter () . filter (| (_ , flag) | flag . ord != 0 && self . ord & flag . ord == flag . ord) . map (| (name , _) | name) . collect () ; write ! (f , "{}({})" , "ConnectFlags" , set_flags . join (" | ")) } } impl crate :: obj :: EngineBitfield for ConnectFlags { fn try_from_ord (ord : u64) -> Option < Self > { Some (Self { ord }) } fn ord (self) -> u64 { self . ord } } impl std :: ops :: BitOr for ConnectFlags { type Output = Self ; fn bitor (self , rhs : Self) -> Self :: Output { Self { ord : self . ord | rhs . ord } } } impl std :: ops :: BitOrAssign for ConnectFlags { fn bitor_assign (& mut self , rhs : Self) { * self = * self | rhs ; } } impl crate :: meta :: GodotConvert for ConnectFlags { type Via = i64 ; } impl crate :: meta :: ToGodot for ConnectFlags { fn to_godot (& self) -> i64 { self . ord as i64 } } impl crate :: meta :: FromGodot for ConnectFlags { fn try_from_godot (via : i64) -> Result < Self , crate :: meta :: ConvertError > { Ok (Self { ord : via as u64 }) } }