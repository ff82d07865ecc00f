use crate :: builtin :: * ; use crate :: meta :: { Signature , ToGodot } ; use crate :: obj :: { Gd , Inherits , ObjectArg } ; use crate :: sys ; # [doc = "Engine class `Node`."] # [derive (Debug)] # [repr (C)] pub struct Node { object_ptr : sys :: GDExtensionObjectPtr , } impl Node { pub const NOTIFICATION_READY : i64 = 13 ; pub const NOTIFICATION_PROCESS : i64 = 17 ; # [doc = "Calls `Node::set_name`."] pub fn set_name (& mut self , name : impl Into < GString >) { unsafe { Signature :: < (GString ,) , () > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Node__set_name , self . object_ptr , (name . into () ,) ,) } } # [doc = "Calls `Node::get_name`."] pub fn get_name (& self ,) -> GString { unsafe { Signature :: < () , GString > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Node__get_name , self . object_ptr , () ,) } } # [doc = "Calls `Node::add_child`, with default arguments."] pub fn add_child (& mut self , node : & Gd < impl Inherits < crate :: classes :: Node >>) { self . add_child_ex (node) . done () } # [doc = "Calls `Node::add_child`; the returned builder allows overriding default arguments before [`ExAddChild::done()`]."] pub fn add_child_ex < 'a > (& 'a mut self , node : & 'a Gd < impl Inherits < crate :: classes :: Node >>) -> ExAddChild < 'a > { ExAddChild :: new (self , ObjectArg :: from_gd (node)) } fn add_child_full (& mut self , node : ObjectArg < crate :: classes :: Node > , force_readable_name : bool) { unsafe { Signature :: < (ObjectArg < crate :: classes :: Node > , bool ,) , () > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Node__add_child , self . object_ptr , (node , force_readable_name ,) ,) } } # [doc = "Calls `Node::get_child`."] pub fn get_child (& self , idx : i32) -> Option < Gd < crate :: classes :: Node >> { unsafe { Signature :: < (i32 ,) , Option < Gd < crate :: classes :: Node >> > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Node__get_child , self . object_ptr , (idx ,) ,) } } # [doc = "Calls `Node::get_child_count`."] pub fn get_child_count (& self ,) -> i32 { unsafe { Signature :: < () , i32 > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Node__get_child_count , self . object_ptr , () ,) } } # [doc = "Calls `Node::set_process_mode`."] pub fn set_process_mode (& mut self , mode : crate :: classes :: node :: ProcessMode) { unsafe { Signature :: < (crate :: classes :: node :: ProcessMode ,) , () > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Node__set_process_mode , self . object_ptr , (mode ,) ,) } } # [doc = "Calls `Node::get_process_mode`."] pub fn get_process_mode (& self ,) -> crate :: classes :: node :: ProcessMode { unsafe { Signature :: < () , crate :: classes :: node :: ProcessMode > :: out_class_ptrcall (crate :: gen :: central :: method_index :: Node__get_process_mode , self . object_ptr , () ,) } } # [doc = "View of this object as its base class `Object`."] pub fn as_object (& self) -> & crate :: classes :: Object { unsafe { & * (self as * const Self as * const crate :: classes :: Object) } } # [doc = "View of this object as its base class `Object`."] pub fn as_object_mut (& mut self) -> & mut crate :: classes :: Object { unsafe { & mut * (self as * mut Self as * mut crate :: classes :: Object) } } } # [doc = r" Signals."] impl Node { # [doc = "Connects `callable` to the signal `child_entered_tree`."] pub fn connect_child_entered_tree (& mut self , callable : & Callable) -> crate :: global :: Error { self . connect ("child_entered_tree" , callable) } # [doc = "Emits the signal `child_entered_tree`."] pub fn emit_child_entered_tree (& mut self , node : & Gd < impl Inherits < crate :: classes :: Node >>) -> crate :: global :: Error { self . emit_signal ("child_entered_tree" , & [node . to_variant ()]) } } impl crate :: obj :: GodotClass for Node { type Base = crate :: classes :: Object ; const CLASS_NAME : & 'static str = "Node" ; fn class_name_c () -> & 'static std :: ffi :: CStr { c"Node" } } unsafe impl crate :: obj :: Bounds for Node { type Memory = crate :: obj :: bounds :: MemManual ; type DynMemory = crate :: obj :: bounds :: MemManual ; type Declarer = crate :: obj :: bounds :: DeclEngine ; } unsafe impl crate :: obj :: Inherits < crate :: classes :: Object > for Node { } impl std :: ops :: Deref for Node { type Target = crate :: classes :: Object ; fn deref (& self) -> & Self :: Target { unsafe { & * (self as * const Self as * const Self :: Target) } } } impl std :: ops :: DerefMut for Node { fn deref_mut (& mut self) -> & mut Self :: Target { unsafe { & mut * (self as * mut Self as * mut Self :: Target) } } } impl crate :: obj :: cap :: GodotDefault for Node { } # [doc (hidden)] # [macro_export] macro_rules ! inherit_from_Node__gdbind { ($ Class : ty) => { unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: Node > for $ Class { } unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: Object > for $ Class { } } ; } # [doc = "Virtual methods of `Node` and its base classes, to override in a host class with `#[godot_api]`."] # [allow (unused_variables)] pub trait INode : crate :: obj :: GodotClass + crate :: private :: You_forgot_the_attribute__godot_api { # [doc = r" Default constructor of the host class, receiving the handle to its engine base."] fn init (base : crate :: obj :: Base < Self :: Base >) -> Self where Self : Sized , { unimplemented ! () } # [doc = "Override of the engine's `_process`."] fn process (& mut self , delta : f64) { unimplemented ! () } # [doc = "Override of the engine's `_ready`."] fn ready (& mut self ,) { unimplemented ! () } } # [doc = "Default-parameter builder for [`Node::add_child_ex()`]."] # [must_use] pub struct ExAddChild < 'a > { surround_object : & 'a mut Node , node : ObjectArg < crate :: classes :: Node > , force_readable_name : bool , } # [allow (clippy :: redundant_field_names , clippy :: needless_update)] impl < 'a > ExAddChild < 'a > { fn new (surround_object : & 'a mut Node , node : ObjectArg < crate :: classes :: Node >) -> Self { Self { surround_object , node , force_readable_name : false , } } # [doc = "Overrides the default of `force_readable_name`."] pub fn force_readable_name (self , force_readable_name : bool) -> Self { Self { force_readable_name : force_readable_name , .. self } } # [doc = r" Performs the call."] pub fn done (self) { let Self { surround_object , node , force_readable_name } = self ; surround_object . add_child_full (node , force_readable_name) } } # [repr (transparent)] # [derive (Copy , Clone , Eq , PartialEq , Ord , PartialOrd , Hash)] pub struct ProcessMode { ord : i32 , } impl ProcessMode { # [doc (alias = "PROCESS_MODE_INHERIT")] # [doc = "Engine enumerator name: `PROCESS_MODE_INHERIT`"] pub const INHERIT : ProcessMode = ProcessMode { ord : 0 } ; # [doc (alias = "PROCESS_MODE_PAUSABLE")] # [doc = "Engine enumerator name: `PROCESS_MODE_PAUSABLE`"] pub const PAUSABLE : ProcessMode = ProcessMode { ord : 1 } ; # [doc (alias = "PROCESS_MODE_WHEN_PAUSED")] # [doc = "Engine enumerator name: `PROCESS_MODE_WHEN_PAUSED`"] pub const WHEN_PAUSED : ProcessMode = ProcessMode { ord : 2 } ; # [doc (alias = "PROCESS_MODE_ALWAYS")] # [doc = "Engine enumerator name: `PROCESS_MODE_ALWAYS`"] pub const ALWAYS : ProcessMode = ProcessMode { ord : 3 } ; # [doc (alias = "PROCESS_MODE_DISABLED")] # [doc = "Engine enumerator name: `PROCESS_MODE_DISABLED`"] pub const DISABLED : ProcessMode = ProcessMode { ord : 4 } ; } impl std :: fmt :: Debug for ProcessMode { fn fmt (& self , f : & mut std :: fmt :: Formatter < '_ >) -> std :: fmt :: Result { let enumerator = match self . ord { 0 => "INHERIT" , 1 => "PAUSABLE" , 2 => "WHEN_PAUSED" , 3 => "ALWAYS" , 4 => "DISABLED" , _ => return f . debug_struct ("ProcessMode") . field ("ord" , & self . ord) . finish () , } ; f . write_str (enumerator) } } impl crate :: obj :: EngineEnum for ProcessMode { fn try_from_ord (ord : i32) -> Option < Self > { match ord { 0 | 1 | 2 | 3 | 4 => Some (Self { ord }) , _ => None , } } fn ord (self) -> i32 { self . ord } fn as_str (& self) -> & 'static str { match self . ord { 0 => "PROCESS_MODE_INHERIT" , 1 => "PROCESS_MODE_PAUSABLE" , 2 => "PROCESS_MODE_WHEN_PAUSED" , 3 => "PROCESS_MODE_ALWAYS" , 4 => "PROCESS_MODE_DISABLED" , _ => "" , } } } impl crate :: meta :: GodotConvert for ProcessMode { type Via = i64 ; } impl crate :: meta :: ToGodot for ProcessMode { fn to_godot (& self) -> i64 { i64 :: from (self . ord) } } impl crate :: meta :: FromGodot for ProcessMode { fn try_from_godot (via : i64) -> Result < Self , crate :: meta :: ConvertError > { i32 :: try_from (via) . ok () . and_then (< Self as crate :: obj :: EngineEnum > :: try_from_ord) . ok_or_else (|| { crate :: meta :: ConvertError :: with_kind_value (crate :: meta :: ErrorKind :: BadEnumOrdinal { enum_name : "ProcessMode" } , via ,) }) } }